use serde::{Deserialize, Serialize};
use skatepark_common::MaterialSlot;
use skatepark_scene::Sampling;
use std::f32::consts::FRAC_PI_2;

/// One image to load and the slot it is bound through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureRequest {
    pub slot: MaterialSlot,
    /// File name relative to the texture directory.
    pub file: String,
    pub sampling: Sampling,
}

impl TextureRequest {
    pub fn new(slot: MaterialSlot, file: impl Into<String>, sampling: Sampling) -> Self {
        Self {
            slot,
            file: file.into(),
            sampling,
        }
    }
}

/// The textures the stage loads at startup.
pub fn default_requests() -> Vec<TextureRequest> {
    let mut arms = Sampling::repeat(1.0, 1.0);
    arms.rotation = FRAC_PI_2;
    arms.center = glam::Vec2::splat(0.5);

    vec![
        TextureRequest::new(MaterialSlot::Torso, "flower.jpg", Sampling::repeat(1.0, 1.0)),
        TextureRequest::new(MaterialSlot::Feet, "shoe.png", Sampling::clamp()),
        TextureRequest::new(MaterialSlot::Arms, "muscle.png", arms),
        TextureRequest::new(MaterialSlot::Legs, "stripes.png", Sampling::repeat(1.0, 1.0)),
        TextureRequest::new(MaterialSlot::Deck, "board.png", Sampling::clamp()),
        TextureRequest::new(MaterialSlot::Head, "face.png", Sampling::clamp()),
        TextureRequest::new(MaterialSlot::Ground, "ground.png", Sampling::repeat(10.0, 100.0)),
    ]
}
