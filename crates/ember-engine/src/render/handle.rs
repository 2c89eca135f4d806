use std::fmt;
use std::num::NonZeroU32;

macro_rules! gfx_handle {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            pub(crate) const KIND: &'static str = $kind;

            #[inline]
            pub(crate) const fn new(raw: NonZeroU32) -> Self {
                Self(raw)
            }

            /// Raw handle value. Never zero.
            #[inline]
            pub const fn get(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", Self::KIND, self.0)
            }
        }
    };
}

gfx_handle!(
    /// Compiled shader program.
    ShaderId,
    "shader"
);
gfx_handle!(
    /// Sampled 2D texture.
    TextureId,
    "texture"
);
gfx_handle!(
    /// Offscreen color target with an attached texture.
    FramebufferId,
    "framebuffer"
);
gfx_handle!(
    /// Uploaded vertex geometry.
    GeometryId,
    "geometry"
);

/// Monotonic source of non-zero raw handle values shared by all handle kinds.
#[derive(Debug)]
pub(crate) struct HandleAllocator {
    next: u32,
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl HandleAllocator {
    pub(crate) fn next(&mut self) -> NonZeroU32 {
        let raw = NonZeroU32::new(self.next).unwrap_or(NonZeroU32::MIN);
        self.next = self.next.wrapping_add(1).max(1);
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_never_yields_zero_and_is_unique() {
        let mut alloc = HandleAllocator::default();
        let a = alloc.next();
        let b = alloc.next();
        assert_eq!(a.get(), 1);
        assert_ne!(a, b);
    }

    #[test]
    fn allocator_skips_zero_on_wrap() {
        let mut alloc = HandleAllocator { next: u32::MAX };
        assert_eq!(alloc.next().get(), u32::MAX);
        assert_eq!(alloc.next().get(), 1);
    }

    #[test]
    fn display_names_kind() {
        let id = TextureId::new(NonZeroU32::MIN);
        assert_eq!(id.to_string(), "texture#1");
    }
}
