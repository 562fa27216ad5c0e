use crate::coords::Vec2;
use crate::paint::Color;

use super::{ImmediateBackend, Primitive, TextureId};

/// One call made against an [`ImmediateBackend`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawCommand {
    Begin(Primitive),
    End,
    Vertex(Vec2),
    TexCoord(Vec2),
    Color(Color),
    BindTexture(Option<TextureId>),
}

/// Backend that records every call in order.
///
/// Used to inspect what a draw routine emits, or to replay it later into
/// another backend with [`CommandRecorder::replay`].
#[derive(Debug, Default, Clone)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
    bound: Option<TextureId>,
}

impl CommandRecorder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder whose binding state starts as `bound`, without recording a bind.
    #[inline]
    pub fn with_bound_texture(bound: Option<TextureId>) -> Self {
        Self {
            commands: Vec::new(),
            bound,
        }
    }

    /// Recorded commands in call order.
    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drops recorded commands. Binding state and capacity are kept.
    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Emitted vertex positions in order.
    pub fn vertices(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Vertex(p) => Some(*p),
            _ => None,
        })
    }

    /// Emitted texture coordinates in order.
    pub fn tex_coords(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::TexCoord(uv) => Some(*uv),
            _ => None,
        })
    }

    /// Primitives begun, in order.
    pub fn primitives(&self) -> impl Iterator<Item = Primitive> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Begin(p) => Some(*p),
            _ => None,
        })
    }

    /// Re-issues every recorded command against `backend`.
    pub fn replay(&self, backend: &mut dyn ImmediateBackend) {
        for cmd in &self.commands {
            match *cmd {
                DrawCommand::Begin(p) => backend.begin(p),
                DrawCommand::End => backend.end(),
                DrawCommand::Vertex(p) => backend.vertex(p),
                DrawCommand::TexCoord(uv) => backend.tex_coord(uv),
                DrawCommand::Color(c) => backend.color(c),
                DrawCommand::BindTexture(t) => backend.bind_texture(t),
            }
        }
    }
}

impl ImmediateBackend for CommandRecorder {
    #[inline]
    fn begin(&mut self, primitive: Primitive) {
        self.commands.push(DrawCommand::Begin(primitive));
    }

    #[inline]
    fn end(&mut self) {
        self.commands.push(DrawCommand::End);
    }

    #[inline]
    fn vertex(&mut self, position: Vec2) {
        self.commands.push(DrawCommand::Vertex(position));
    }

    #[inline]
    fn tex_coord(&mut self, uv: Vec2) {
        self.commands.push(DrawCommand::TexCoord(uv));
    }

    #[inline]
    fn color(&mut self, color: Color) {
        self.commands.push(DrawCommand::Color(color));
    }

    #[inline]
    fn bound_texture(&self) -> Option<TextureId> {
        self.bound
    }

    #[inline]
    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.bound = texture;
        self.commands.push(DrawCommand::BindTexture(texture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order() {
        let mut rec = CommandRecorder::new();
        rec.begin(Primitive::Triangles);
        rec.color(Color::WHITE);
        rec.tex_coord(Vec2::new(0.5, 0.5));
        rec.vertex(Vec2::new(1.0, 2.0));
        rec.end();

        assert_eq!(
            rec.commands(),
            &[
                DrawCommand::Begin(Primitive::Triangles),
                DrawCommand::Color(Color::WHITE),
                DrawCommand::TexCoord(Vec2::new(0.5, 0.5)),
                DrawCommand::Vertex(Vec2::new(1.0, 2.0)),
                DrawCommand::End,
            ]
        );
        assert_eq!(rec.vertices().collect::<Vec<_>>(), vec![Vec2::new(1.0, 2.0)]);
        assert_eq!(rec.primitives().collect::<Vec<_>>(), vec![Primitive::Triangles]);
    }

    #[test]
    fn with_bound_texture_records_nothing() {
        let rec = CommandRecorder::with_bound_texture(Some(TextureId(9)));
        assert!(rec.is_empty());
        assert_eq!(rec.bound_texture(), Some(TextureId(9)));
    }

    #[test]
    fn clear_keeps_binding() {
        let mut rec = CommandRecorder::new();
        rec.bind_texture(Some(TextureId(1)));
        rec.clear();
        assert!(rec.is_empty());
        assert_eq!(rec.bound_texture(), Some(TextureId(1)));
    }

    #[test]
    fn replay_reproduces_the_stream() {
        let mut src = CommandRecorder::new();
        src.bind_texture(Some(TextureId(2)));
        src.begin(Primitive::LineStrip);
        src.vertex(Vec2::new(0.0, 0.0));
        src.vertex(Vec2::new(3.0, 4.0));
        src.end();

        let mut dst = CommandRecorder::new();
        src.replay(&mut dst);
        assert_eq!(dst.commands(), src.commands());
        assert_eq!(dst.bound_texture(), Some(TextureId(2)));
    }
}
