use crate::environment::Environment;
use crate::labels::{WORLD_LABELS, WorldLabel};
use glam::Vec3;
use skatepark_assets::{TextureLoaded, TextureLoader, TextureStore, default_requests};
use skatepark_common::{GameConfig, MaterialSlot};
use skatepark_input::{Action, Key, KeyBindings, PlayerController};
use skatepark_rig::Character;
use skatepark_scene::{SceneGraph, TextureBinding};
use skatepark_sky::{DayNightCycle, Lighting, StarField};
use std::time::{Duration, Instant};

/// Per-frame statistics for instrumentation.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub frame: u64,
    pub actions: usize,
    pub textures_applied: usize,
    pub update_time: Duration,
}

/// Owns the scene and drives it one frame at a time.
///
/// Frame order: drain finished texture loads, sample the controller, apply
/// its actions to the character, update the character, advance the day/night
/// cycle and push its lighting into the scene. Drawing is left to the caller.
#[derive(Debug)]
pub struct Stage {
    config: GameConfig,
    scene: SceneGraph,
    character: Character,
    controller: PlayerController,
    cycle: DayNightCycle,
    lighting: Lighting,
    environment: Environment,
    stars: StarField,
    textures: TextureStore,
    loader: TextureLoader,
    stats: FrameStats,
}

impl Stage {
    pub fn new(config: GameConfig) -> Self {
        let mut scene = SceneGraph::new();
        let environment = Environment::build(&mut scene);
        let root = scene.root();
        let character = Character::build(&mut scene, root, &config);
        let controller = PlayerController::new(KeyBindings::default(), &config.controls);
        let cycle = DayNightCycle::new(&config.day_night);
        let lighting = cycle.lighting();
        let stars = StarField::generate(&config.stars);
        let loader = TextureLoader::new(config.assets.texture_dir.clone());

        let mut stage = Self {
            config,
            scene,
            character,
            controller,
            cycle,
            lighting,
            environment,
            stars,
            textures: TextureStore::new(),
            loader,
            stats: FrameStats::default(),
        };
        stage.apply_lighting();
        tracing::info!(
            nodes = stage.scene.node_count(),
            meshes = stage.scene.mesh_count(),
            materials = stage.scene.material_count(),
            stars = stage.stars.len(),
            "stage built"
        );
        stage
    }

    /// Request every startup texture. Does nothing when loading is disabled.
    pub fn load_textures(&mut self) {
        if !self.config.assets.load_textures {
            tracing::debug!("texture loading disabled");
            return;
        }
        self.loader.request_all(default_requests());
    }

    /// Block until outstanding loads finish or `timeout` passes, then bind them.
    pub fn wait_for_textures(&mut self, timeout: Duration) -> usize {
        let loaded = self.loader.wait_all(timeout);
        self.apply_loaded(loaded)
    }

    pub fn pending_textures(&self) -> usize {
        self.loader.pending()
    }

    pub fn handle_key(&mut self, key: Key, pressed: bool) -> bool {
        self.controller.handle_key(key, pressed)
    }

    /// Key edge by browser key code; unknown codes are ignored.
    pub fn handle_code(&mut self, code: &str, pressed: bool) -> bool {
        self.controller.handle_code(code, pressed)
    }

    pub fn release_all(&mut self) {
        self.controller.release_all();
    }

    /// Advance one frame of `dt` seconds.
    pub fn update(&mut self, dt: f32) -> &FrameStats {
        let frame = self.stats.frame + 1;
        let _span = tracing::info_span!("stage_update", frame).entered();
        let start = Instant::now();

        let loaded = self.loader.drain();
        let textures_applied = self.apply_loaded(loaded);

        let actions = self.controller.update(dt, self.character.heading());
        for action in &actions {
            self.apply_action(action);
        }

        self.character.update(&mut self.scene, dt);

        self.lighting = self.cycle.advance(dt);
        self.apply_lighting();

        self.stats = FrameStats {
            frame,
            actions: actions.len(),
            textures_applied,
            update_time: start.elapsed(),
        };
        tracing::trace!(
            actions = actions.len(),
            time = self.lighting.time,
            "stage update complete"
        );
        &self.stats
    }

    fn apply_action(&mut self, action: &Action) {
        match *action {
            Action::Move(direction) => self.character.move_by(&mut self.scene, direction),
            Action::Turn(amount) => self.character.turn(&mut self.scene, amount),
            Action::Jump => self.character.jump(),
            // Tricks are not simulated.
            Action::Ollie => {}
        }
    }

    fn apply_lighting(&mut self) {
        self.environment.apply_lighting(&mut self.scene, &self.lighting);
        self.character
            .set_light_intensity(&mut self.scene, self.lighting.character_light);
    }

    fn apply_loaded(&mut self, loaded: Vec<TextureLoaded>) -> usize {
        let mut applied = 0;
        for TextureLoaded {
            slot,
            sampling,
            result,
            ..
        } in loaded
        {
            // Failures were already reported by the loader.
            let Ok(image) = result else { continue };
            let texture = self.textures.insert(image);
            if self.bind_texture(slot, TextureBinding { texture, sampling }) {
                applied += 1;
            }
        }
        applied
    }

    /// Bind a stored texture to a slot. Returns false for unknown targets.
    pub fn bind_texture(&mut self, slot: MaterialSlot, binding: TextureBinding) -> bool {
        if slot == MaterialSlot::Ground {
            return self.environment.set_ground_texture(&mut self.scene, binding);
        }
        self.character.set_texture(&mut self.scene, slot, binding)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn controller(&self) -> &PlayerController {
        &self.controller
    }

    pub fn cycle(&self) -> &DayNightCycle {
        &self.cycle
    }

    /// Jump the cycle to a time of day and relight the scene.
    pub fn set_time_of_day(&mut self, time: f32) {
        self.cycle.set_time(time);
        self.lighting = self.cycle.lighting();
        self.apply_lighting();
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    pub fn textures(&self) -> &TextureStore {
        &self.textures
    }

    pub fn labels(&self) -> &'static [WorldLabel] {
        &WORLD_LABELS
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn character_position(&self) -> Vec3 {
        self.character.position(&self.scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use skatepark_common::AssetConfig;

    const DT: f32 = 1.0 / 60.0;

    fn headless() -> GameConfig {
        GameConfig {
            assets: AssetConfig {
                load_textures: false,
                ..AssetConfig::default()
            },
            ..GameConfig::default()
        }
    }

    fn settle(stage: &mut Stage) {
        for _ in 0..240 {
            stage.update(DT);
        }
    }

    #[test]
    fn character_falls_onto_the_ground() {
        let mut stage = Stage::new(headless());
        assert!(stage.character_position().y > 3.0);
        settle(&mut stage);
        let ground = stage.character().physics().ground_offset();
        assert_eq!(stage.character_position().y, ground);
        assert!(stage.character().physics().is_grounded());
        assert_eq!(stage.stats().frame, 240);
    }

    #[test]
    fn forward_moves_along_heading() {
        let mut stage = Stage::new(headless());
        settle(&mut stage);
        let before = stage.character_position();
        assert!(stage.handle_code("KeyW", true));
        for _ in 0..30 {
            stage.update(DT);
        }
        let moved = stage.character_position() - before;
        // Heading 3π/2 maps forward (−z) onto −x.
        assert!(moved.x < -1.0, "moved = {moved}");
        assert!(moved.z.abs() < 1e-3);
        assert_eq!(stage.stats().actions, 1);
    }

    #[test]
    fn held_jump_leaves_the_ground() {
        let mut stage = Stage::new(headless());
        settle(&mut stage);
        stage.handle_key(Key::Space, true);
        stage.update(DT);
        assert!(!stage.character().physics().is_grounded());
        stage.handle_key(Key::Space, false);
        settle(&mut stage);
        assert!(stage.character().physics().is_grounded());
    }

    #[test]
    fn ollie_and_unknown_keys_change_nothing() {
        let mut stage = Stage::new(headless());
        settle(&mut stage);
        let before = stage.character_position();
        assert!(!stage.handle_code("KeyQ", true));
        stage.handle_key(Key::KeyE, true);
        stage.update(DT);
        assert_eq!(stage.character_position(), before);
        assert_eq!(stage.stats().actions, 1);
    }

    #[test]
    fn character_light_tracks_time_of_day() {
        let mut stage = Stage::new(headless());
        stage.set_time_of_day(0.75);
        let light = stage.character().lights().character;
        assert_eq!(
            stage.scene().light(light).unwrap().intensity,
            stage.lighting().character_light
        );
        assert!(stage.lighting().character_light > 0.6);
        stage.set_time_of_day(0.25);
        assert_eq!(stage.scene().light(light).unwrap().intensity, 0.0);
    }

    #[test]
    fn day_advances_with_frames() {
        let mut stage = Stage::new(headless());
        let start = stage.cycle().time();
        stage.update(6.0);
        let expected = (start + 6.0 / stage.config().day_night.cycle_seconds).rem_euclid(1.0);
        assert!((stage.cycle().time() - expected).abs() < 1e-5);
    }

    #[test]
    fn textures_bind_after_loading() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(2, 2, Rgba([200, 10, 10, 255]))
            .save(dir.path().join("face.png"))
            .unwrap();
        RgbaImage::from_pixel(2, 2, Rgba([10, 200, 10, 255]))
            .save(dir.path().join("ground.png"))
            .unwrap();

        let config = GameConfig {
            assets: AssetConfig {
                texture_dir: dir.path().to_path_buf(),
                load_textures: true,
            },
            ..GameConfig::default()
        };
        let mut stage = Stage::new(config);
        stage.load_textures();
        assert_eq!(stage.pending_textures(), 7);
        let applied = stage.wait_for_textures(Duration::from_secs(10));
        assert_eq!(applied, 2);
        assert_eq!(stage.pending_textures(), 0);
        assert_eq!(stage.textures().len(), 2);

        let head = stage.character().materials().head;
        assert!(stage.scene().material(head).unwrap().texture.is_some());
        let ground = stage.environment().ground_material;
        let binding = stage.scene().material(ground).unwrap().texture.unwrap();
        assert_eq!(binding.sampling.repeat, glam::Vec2::new(10.0, 100.0));
        let torso = stage.character().materials().torso;
        assert!(stage.scene().material(torso).unwrap().texture.is_none());
    }

    #[test]
    fn disabled_loading_requests_nothing() {
        let mut stage = Stage::new(headless());
        stage.load_textures();
        assert_eq!(stage.pending_textures(), 0);
    }

    #[test]
    fn labels_and_sky_are_exposed() {
        let stage = Stage::new(headless());
        assert_eq!(stage.labels().len(), 7);
        assert_eq!(stage.stars().len(), 2000);
    }
}
