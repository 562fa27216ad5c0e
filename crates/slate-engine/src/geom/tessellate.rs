use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};

use crate::coords::Vec2;

use super::{GeomError, TriangleList};

/// Triangulates a closed contour with lyon's fill tessellator (non-zero rule).
///
/// Contours with fewer than three points produce an empty list.
pub fn tessellate(contour: &[Vec2]) -> Result<TriangleList, GeomError> {
    let Some((first, rest)) = contour.split_first() else {
        return Ok(TriangleList::new());
    };
    if rest.len() < 2 {
        return Ok(TriangleList::new());
    }

    let mut builder = Path::builder();
    builder.begin(point(first.x, first.y));
    for p in rest {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(true);
    let path = builder.build();

    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::non_zero(),
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| {
                let p = v.position();
                Vec2::new(p.x, p.y)
            }),
        )
        .map_err(|e| GeomError::Tessellation(e.to_string()))?;

    Ok(TriangleList::from_indexed(&buffers.vertices, &buffers.indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn triangle_stays_one_triangle() {
        let list = tessellate(&[v(0.0, 0.0), v(10.0, 0.0), v(5.0, 10.0)]).unwrap();
        assert_eq!(list.len(), 1);
        assert!((list.area() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn square_covers_its_area() {
        let list = tessellate(&[v(0.0, 0.0), v(4.0, 0.0), v(4.0, 4.0), v(0.0, 4.0)]).unwrap();
        assert_eq!(list.len(), 2);
        assert!((list.area() - 16.0).abs() < 1e-3);
    }

    #[test]
    fn concave_l_shape_covers_its_area() {
        // 2x2 square with the top-right 1x1 quadrant removed.
        let contour = [
            v(0.0, 0.0),
            v(1.0, 0.0),
            v(1.0, 1.0),
            v(2.0, 1.0),
            v(2.0, 2.0),
            v(0.0, 2.0),
        ];
        let list = tessellate(&contour).unwrap();
        assert!((list.area() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn too_few_points_is_empty() {
        assert!(tessellate(&[]).unwrap().is_empty());
        assert!(tessellate(&[v(0.0, 0.0), v(1.0, 1.0)]).unwrap().is_empty());
    }
}
