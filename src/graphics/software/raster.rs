//! Triangle rasterization, texture sampling and blending for the software
//! backend.

use {
    crate::{
        graphics::backend::{BlendFactor, BlendFunc, Rgba, TextureFilter},
        math::{transform_point, Mat4},
    },
    image::RgbaImage,
};

/// A texture owned by a software context.
pub(super) struct Texture {
    pub min_filter: TextureFilter,
    pub mag_filter: TextureFilter,
    pub image: Option<RgbaImage>,
}

impl Texture {
    pub fn new() -> Self {
        // GL's default minification filter needs mipmaps, linear is the
        // closest thing without them
        Self {
            min_filter: TextureFilter::Linear,
            mag_filter: TextureFilter::Linear,
            image: None,
        }
    }
}

/// Everything a single draw needs from the current context.
pub(super) struct DrawState<'a> {
    pub transform: Mat4,
    pub viewport: (u32, u32),
    pub color: Rgba,
    pub texture: Option<&'a Texture>,
    pub blend: Option<BlendFunc>,
}

#[derive(Debug, Copy, Clone)]
struct ScreenVertex {
    x: f32,
    y: f32,
    uv: [f32; 2],
}

/// Rasterize indexed triangles into the target.
pub(super) fn draw_triangles(
    target: &mut RgbaImage,
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    indices: &[u16],
    state: &DrawState,
) {
    for triangle in indices.chunks_exact(3) {
        let vertices = triangle
            .iter()
            .map(|&index| {
                let index = index as usize;
                let position = positions.get(index)?;
                let uv = tex_coords.get(index).copied().unwrap_or([0.0, 0.0]);
                Some(to_screen(state, *position, uv))
            })
            .collect::<Option<Vec<ScreenVertex>>>();
        match vertices {
            Some(v) => fill_triangle(target, [v[0], v[1], v[2]], state),
            None => log::trace!("Skipping triangle {:?}, index out of range", triangle),
        }
    }
}

fn to_screen(
    state: &DrawState,
    position: [f32; 3],
    uv: [f32; 2],
) -> ScreenVertex {
    let clip = transform_point(&state.transform, position);
    let (ndc_x, ndc_y) = (clip.x / clip.w, clip.y / clip.w);
    let (width, height) = state.viewport;
    ScreenVertex {
        x: (ndc_x + 1.0) * 0.5 * width as f32,
        y: (1.0 - ndc_y) * 0.5 * height as f32,
        uv,
    }
}

/// Twice the signed area of (a, b, p).
fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Pixels exactly on an edge belong to only one of the two triangles that
/// share it. Triangles are normalized to positive area first, so a shared
/// edge is walked in opposite directions by its two triangles.
fn owns_edge(a: &ScreenVertex, b: &ScreenVertex) -> bool {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    dy > 0.0 || (dy == 0.0 && dx > 0.0)
}

fn fill_triangle(
    target: &mut RgbaImage,
    [v0, mut v1, mut v2]: [ScreenVertex; 3],
    state: &DrawState,
) {
    let mut area = edge(&v0, &v1, v2.x, v2.y);
    if area == 0.0 || !area.is_finite() {
        return;
    }
    if area < 0.0 {
        std::mem::swap(&mut v1, &mut v2);
        area = -area;
    }

    let max_x = state.viewport.0.min(target.width()) as f32;
    let max_y = state.viewport.1.min(target.height()) as f32;
    let left = v0.x.min(v1.x).min(v2.x).floor().max(0.0);
    let right = v0.x.max(v1.x).max(v2.x).ceil().min(max_x);
    let top = v0.y.min(v1.y).min(v2.y).floor().max(0.0);
    let bottom = v0.y.max(v1.y).max(v2.y).ceil().min(max_y);
    if left >= right || top >= bottom {
        return;
    }

    let sampler = state
        .texture
        .and_then(|texture| Some((texture, texture.image.as_ref()?)))
        .map(|(texture, image)| {
            let filter = if texels_per_pixel(&v0, &v1, &v2, area, image) > 1.0
            {
                texture.min_filter
            } else {
                texture.mag_filter
            };
            (image, filter)
        });

    let owns = [owns_edge(&v1, &v2), owns_edge(&v2, &v0), owns_edge(&v0, &v1)];
    for py in top as u32..bottom as u32 {
        for px in left as u32..right as u32 {
            let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
            let weights = [
                edge(&v1, &v2, cx, cy),
                edge(&v2, &v0, cx, cy),
                edge(&v0, &v1, cx, cy),
            ];
            let inside = weights
                .iter()
                .zip(owns.iter())
                .all(|(&w, &owned)| w > 0.0 || (w == 0.0 && owned));
            if !inside {
                continue;
            }

            let src = match sampler {
                Some((image, filter)) => {
                    let u = (weights[0] * v0.uv[0]
                        + weights[1] * v1.uv[0]
                        + weights[2] * v2.uv[0])
                        / area;
                    let v = (weights[0] * v0.uv[1]
                        + weights[1] * v1.uv[1]
                        + weights[2] * v2.uv[1])
                        / area;
                    modulate(sample(image, filter, u, v), state.color)
                }
                None => state.color,
            };

            let pixel = target.get_pixel_mut(px, py);
            *pixel = blend(src, *pixel, state.blend);
        }
    }
}

/// How many texels a one-pixel step in x covers, used to pick between the
/// minification and magnification filters.
fn texels_per_pixel(
    v0: &ScreenVertex,
    v1: &ScreenVertex,
    v2: &ScreenVertex,
    area: f32,
    image: &RgbaImage,
) -> f32 {
    let du_dx = (v0.uv[0] * (v1.y - v2.y)
        + v1.uv[0] * (v2.y - v0.y)
        + v2.uv[0] * (v0.y - v1.y))
        / area;
    let dv_dx = (v0.uv[1] * (v1.y - v2.y)
        + v1.uv[1] * (v2.y - v0.y)
        + v2.uv[1] * (v0.y - v1.y))
        / area;
    let du = du_dx * image.width() as f32;
    let dv = dv_dx * image.height() as f32;
    (du * du + dv * dv).sqrt()
}

fn texel(image: &RgbaImage, x: i64, y: i64) -> Rgba {
    let x = x.clamp(0, image.width() as i64 - 1) as u32;
    let y = y.clamp(0, image.height() as i64 - 1) as u32;
    let [r, g, b, a] = image.get_pixel(x, y).0;
    Rgba::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    )
}

fn sample(image: &RgbaImage, filter: TextureFilter, u: f32, v: f32) -> Rgba {
    let x = u * image.width() as f32;
    let y = v * image.height() as f32;
    match filter {
        TextureFilter::Nearest => texel(image, x.floor() as i64, y.floor() as i64),
        TextureFilter::Linear => {
            let (x, y) = (x - 0.5, y - 0.5);
            let (x0, y0) = (x.floor(), y.floor());
            let (fx, fy) = (x - x0, y - y0);
            let (x0, y0) = (x0 as i64, y0 as i64);
            let top = lerp(texel(image, x0, y0), texel(image, x0 + 1, y0), fx);
            let bottom = lerp(
                texel(image, x0, y0 + 1),
                texel(image, x0 + 1, y0 + 1),
                fx,
            );
            lerp(top, bottom, fy)
        }
    }
}

fn lerp(a: Rgba, b: Rgba, t: f32) -> Rgba {
    Rgba::new(
        a.r + (b.r - a.r) * t,
        a.g + (b.g - a.g) * t,
        a.b + (b.b - a.b) * t,
        a.a + (b.a - a.a) * t,
    )
}

fn modulate(texel: Rgba, color: Rgba) -> Rgba {
    Rgba::new(
        texel.r * color.r,
        texel.g * color.g,
        texel.b * color.b,
        texel.a * color.a,
    )
}

fn factor(factor: BlendFactor, src: Rgba) -> f32 {
    match factor {
        BlendFactor::Zero => 0.0,
        BlendFactor::One => 1.0,
        BlendFactor::SrcAlpha => src.a,
        BlendFactor::OneMinusSrcAlpha => 1.0 - src.a,
    }
}

/// Combine a source color with a destination pixel. The surface has no
/// alpha channel, so the stored alpha is always opaque.
pub(super) fn blend(
    src: Rgba,
    dst: image::Rgba<u8>,
    blend: Option<BlendFunc>,
) -> image::Rgba<u8> {
    let out = match blend {
        None => [src.r, src.g, src.b],
        Some(func) => {
            let s = factor(func.src, src);
            let d = factor(func.dst, src);
            let [r, g, b, _] = dst.0;
            [
                src.r * s + r as f32 / 255.0 * d,
                src.g * s + g as f32 / 255.0 * d,
                src.b * s + b as f32 / 255.0 * d,
            ]
        }
    };
    image::Rgba([to_u8(out[0]), to_u8(out[1]), to_u8(out[2]), 255])
}

pub(super) fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
