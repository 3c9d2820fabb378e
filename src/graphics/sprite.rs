use crate::{
    assets::{read_asset, AssetError, AssetStore},
    graphics::backend::{DrawApi, TextureFilter, TextureId},
};

/// Create the sprite texture shared by every firefly.
///
/// The texture is generated and bound before the asset is read, so the
/// returned id is usable even when the asset can't be loaded. A read or
/// decode failure is logged and leaves the texture without an image.
pub fn load_sprite_texture(
    draw: &mut impl DrawApi,
    assets: &impl AssetStore,
    name: &str,
) -> TextureId {
    let texture = draw.generate_texture();
    draw.bind_texture(texture);

    let image = match decode_sprite(assets, name) {
        Ok(image) => image,
        Err(error) => {
            log::error!("Unable to load the sprite texture: {}", error);
            return texture;
        }
    };

    let (width, height) = image.dimensions();
    if !width.is_power_of_two() || !height.is_power_of_two() {
        log::warn!(
            "Sprite {:?} is {}x{}, fixed-function texturing expects \
             power-of-two dimensions",
            name,
            width,
            height
        );
    }

    draw.set_texture_filters(TextureFilter::Linear, TextureFilter::Linear);
    draw.upload_texture(width, height, image.as_raw());

    // the decoded pixels are dropped here, the texture owns the upload
    texture
}

fn decode_sprite(
    assets: &impl AssetStore,
    name: &str,
) -> Result<image::RgbaImage, AssetError> {
    let bytes = read_asset(assets, name)?;
    let image =
        image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
            name: name.to_owned(),
            source,
        })?;
    Ok(image.into_rgba8())
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{
            assets::MemoryAssets,
            graphics::fake::{Call, FakeBackend},
        },
        pretty_assertions::assert_eq,
        std::io::Cursor,
    };

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([255, 255, 255, 128]),
        );
        let mut bytes = vec![];
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn uploads_the_sprite_with_linear_filtering() {
        let mut backend = FakeBackend::new();
        let assets = MemoryAssets::new().with("star.png", png(16, 16));

        let texture = load_sprite_texture(&mut backend, &assets, "star.png");

        assert_eq!(
            backend.draw_calls(),
            vec![
                Call::GenerateTexture(texture),
                Call::BindTexture(texture),
                Call::SetTextureFilters(
                    TextureFilter::Linear,
                    TextureFilter::Linear
                ),
                Call::UploadTexture {
                    width: 16,
                    height: 16,
                    bytes: 16 * 16 * 4
                },
            ]
        );
    }

    #[test]
    fn a_missing_asset_still_produces_a_bound_texture() {
        let mut backend = FakeBackend::new();

        let texture =
            load_sprite_texture(&mut backend, &MemoryAssets::new(), "star.png");

        assert_eq!(
            backend.draw_calls(),
            vec![Call::GenerateTexture(texture), Call::BindTexture(texture)]
        );
    }

    #[test]
    fn an_undecodable_asset_is_not_uploaded() {
        let mut backend = FakeBackend::new();
        let assets =
            MemoryAssets::new().with("star.png", b"not a png".to_vec());

        load_sprite_texture(&mut backend, &assets, "star.png");

        assert!(!backend
            .draw_calls()
            .iter()
            .any(|call| matches!(call, Call::UploadTexture { .. })));
    }

    #[test]
    fn non_power_of_two_sprites_are_still_uploaded() {
        let mut backend = FakeBackend::new();
        let assets = MemoryAssets::new().with("star.png", png(10, 6));

        load_sprite_texture(&mut backend, &assets, "star.png");

        assert_eq!(
            backend.count(&Call::UploadTexture {
                width: 10,
                height: 6,
                bytes: 10 * 6 * 4
            }),
            1
        );
    }
}
