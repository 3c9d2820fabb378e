pub mod backend;
mod context;
mod quad;
mod sprite;

pub mod software;

#[cfg(test)]
pub(crate) mod fake;

pub use self::{
    context::{ContextError, GraphicsContext},
    quad::{QuadGeometry, QUAD_INDICES},
    sprite::load_sprite_texture,
};
