use crate::coords::Vec2;

/// Triangulated interior of a shape.
pub trait Triangles {
    fn triangle_count(&self) -> usize;

    /// Corner `corner` (0, 1 or 2) of triangle `tri`.
    fn triangle_point(&self, tri: usize, corner: usize) -> Vec2;
}

/// Owned triangle soup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleList {
    tris: Vec<[Vec2; 3]>,
}

impl TriangleList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the list from an indexed mesh. A trailing partial triangle is dropped.
    pub fn from_indexed(vertices: &[Vec2], indices: &[u32]) -> Self {
        let tris = indices
            .chunks_exact(3)
            .map(|t| {
                [
                    vertices[t[0] as usize],
                    vertices[t[1] as usize],
                    vertices[t[2] as usize],
                ]
            })
            .collect();
        Self { tris }
    }

    #[inline]
    pub fn push(&mut self, a: Vec2, b: Vec2, c: Vec2) {
        self.tris.push([a, b, c]);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tris.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tris.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &[Vec2; 3]> {
        self.tris.iter()
    }

    /// Sum of the unsigned triangle areas.
    pub fn area(&self) -> f32 {
        self.tris
            .iter()
            .map(|[a, b, c]| {
                let ab = *b - *a;
                let ac = *c - *a;
                (ab.x * ac.y - ab.y * ac.x).abs() * 0.5
            })
            .sum()
    }
}

impl FromIterator<[Vec2; 3]> for TriangleList {
    fn from_iter<I: IntoIterator<Item = [Vec2; 3]>>(iter: I) -> Self {
        Self { tris: iter.into_iter().collect() }
    }
}

impl Triangles for TriangleList {
    #[inline]
    fn triangle_count(&self) -> usize {
        self.tris.len()
    }

    #[inline]
    fn triangle_point(&self, tri: usize, corner: usize) -> Vec2 {
        self.tris[tri][corner]
    }
}
