use core::ops::{Deref, DerefMut};

use super::ImmediateBackend;

/// Backend-assigned texture name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Texture known to a backend, with its pixel size.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Texture {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    #[inline]
    pub const fn new(id: TextureId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }
}

/// Image that can be tiled or fitted across a shape.
///
/// Decoding and upload happen elsewhere; an `Image` only names the texture
/// holding the pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Image {
    texture: Texture,
}

impl Image {
    #[inline]
    pub const fn new(texture: Texture) -> Self {
        Self { texture }
    }

    #[inline]
    pub fn texture(&self) -> Texture {
        self.texture
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.texture.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.texture.height
    }
}

impl From<Texture> for Image {
    #[inline]
    fn from(texture: Texture) -> Self {
        Image::new(texture)
    }
}

/// Binds a texture for the lifetime of the scope.
///
/// The previously bound texture (or the unbound state) is restored on drop,
/// including during unwinding. The scope derefs to the backend so drawing
/// goes through it.
pub struct TextureScope<'a> {
    backend: &'a mut dyn ImmediateBackend,
    previous: Option<TextureId>,
}

impl<'a> TextureScope<'a> {
    pub fn bind(backend: &'a mut dyn ImmediateBackend, texture: Option<TextureId>) -> Self {
        let previous = backend.bound_texture();
        backend.bind_texture(texture);
        Self { backend, previous }
    }

    /// Binding that will be restored.
    #[inline]
    pub fn previous(&self) -> Option<TextureId> {
        self.previous
    }
}

impl<'a> Deref for TextureScope<'a> {
    type Target = dyn ImmediateBackend + 'a;

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.backend
    }
}

impl<'a> DerefMut for TextureScope<'a> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.backend
    }
}

impl Drop for TextureScope<'_> {
    fn drop(&mut self) {
        self.backend.bind_texture(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::render::{CommandRecorder, DrawCommand};

    #[test]
    fn scope_restores_previous_binding() {
        let mut rec = CommandRecorder::with_bound_texture(Some(TextureId(7)));
        {
            let mut scope = TextureScope::bind(&mut rec, Some(TextureId(3)));
            assert_eq!(scope.previous(), Some(TextureId(7)));
            assert_eq!(scope.bound_texture(), Some(TextureId(3)));
            scope.vertex(Vec2::zero());
        }
        assert_eq!(rec.bound_texture(), Some(TextureId(7)));
        assert_eq!(
            rec.commands(),
            &[
                DrawCommand::BindTexture(Some(TextureId(3))),
                DrawCommand::Vertex(Vec2::zero()),
                DrawCommand::BindTexture(Some(TextureId(7))),
            ]
        );
    }

    #[test]
    fn scope_restores_unbound_state() {
        let mut rec = CommandRecorder::new();
        drop(TextureScope::bind(&mut rec, Some(TextureId(1))));
        assert_eq!(rec.bound_texture(), None);
    }

    #[test]
    fn scope_restores_on_unwind() {
        let mut rec = CommandRecorder::with_bound_texture(Some(TextureId(2)));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _scope = TextureScope::bind(&mut rec, None);
            panic!("draw failed");
        }));
        assert!(result.is_err());
        assert_eq!(rec.bound_texture(), Some(TextureId(2)));
    }

    #[test]
    fn image_exposes_texture_size() {
        let image = Image::new(Texture::new(TextureId(4), 64, 32));
        assert_eq!(image.texture().id, TextureId(4));
        assert_eq!((image.width(), image.height()), (64, 32));
    }
}
