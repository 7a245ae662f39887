use crate::components::{BoundingBox, Physical, Player, PlayerControlled, WorldPosition};
use crate::config::{CameraTuning, GameConfig};
use crate::enums::PlayerState;
use crate::level::TileMap;
use crate::plugins::player::{PlayerEntity, PlayerMovementSet};
use crate::timing::{StepTime, TimeStepper};
use bevy::prelude::*;

/// Camera plugin - keeps the player inside a dead zone of the viewport
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScrollOffset>()
            .init_resource::<StepTime>()
            .init_resource::<GameConfig>()
            .add_event::<CenterViewOnPlayer>()
            .add_systems(
                Update,
                (center_view_system, update_scroll_offset_system)
                    .chain()
                    .after(PlayerMovementSet)
                    .run_if(resource_exists::<PlayerEntity>())
                    .run_if(resource_exists::<TileMap>()),
            );
    }
}

/// Top-left corner of the visible map section, in tiles
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollOffset(pub IVec2);

/// Request to jump the camera straight to the player
#[derive(Event, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CenterViewOnPlayer;

/// Dead zone for the current movement state, relative to the viewport
pub fn dead_zone_for_state(state: PlayerState, tuning: &CameraTuning) -> BoundingBox {
    match state {
        PlayerState::ClimbingLadder => tuning.climbing_dead_zone,
        _ => tuning.default_dead_zone,
    }
}

/// Largest valid scroll offset. Maps smaller than the viewport cannot scroll.
pub fn max_scroll_offset(map_width: usize, map_height: usize, tuning: &CameraTuning) -> IVec2 {
    IVec2::new(
        (map_width as i32 - tuning.viewport_width_tiles).max(0),
        (map_height as i32 - tuning.viewport_height_tiles).max(0),
    )
}

pub fn clamp_scroll_offset(offset: IVec2, max_offset: IVec2) -> IVec2 {
    offset.clamp(IVec2::ZERO, max_offset)
}

/// How far the camera must move so `player_bounds` is back inside the
/// dead zone
pub fn dead_zone_correction(
    player_bounds: &BoundingBox,
    dead_zone: &BoundingBox,
    scroll_offset: IVec2,
) -> IVec2 {
    let zone = BoundingBox {
        x: dead_zone.x + scroll_offset.x,
        y: dead_zone.y + scroll_offset.y,
        ..*dead_zone
    };

    let offset_left = (zone.left() - player_bounds.left()).max(0);
    let offset_right = (zone.right() - player_bounds.right()).min(0);
    let offset_top = (zone.top() - player_bounds.top()).max(0);
    let offset_bottom = (zone.bottom() - player_bounds.bottom()).min(0);

    IVec2::new(-offset_left - offset_right, -offset_top - offset_bottom)
}

/// Compute the next scroll offset for one step
pub fn next_scroll_offset(
    scroll_offset: IVec2,
    controls: &PlayerControlled,
    position: WorldPosition,
    physical: &Physical,
    has_ticks: bool,
    max_offset: IVec2,
    tuning: &CameraTuning,
) -> IVec2 {
    let mut offset = scroll_offset;

    // Overshoot is fine here, the clamp below corrects it
    if has_ticks {
        if controls.is_looking_down {
            offset.y += tuning.look_scroll_step;
        }
        if controls.is_looking_up {
            offset.y -= tuning.look_scroll_step;
        }
    }

    let player_bounds = physical.collision_rect.anchored_at(position);
    let dead_zone = dead_zone_for_state(controls.state, tuning);
    offset += dead_zone_correction(&player_bounds, &dead_zone, offset);

    clamp_scroll_offset(offset, max_offset)
}

/// Scroll offset that puts the player in the horizontal middle of the view
/// with its feet on the bottom edge of the default dead zone
pub fn centered_scroll_offset(
    position: WorldPosition,
    physical: &Physical,
    max_offset: IVec2,
    tuning: &CameraTuning,
) -> IVec2 {
    let bounds = physical.collision_rect.anchored_at(position);
    let offset = IVec2::new(
        bounds.left() + bounds.width / 2 - tuning.viewport_width_tiles / 2,
        bounds.bottom() - tuning.default_dead_zone.bottom(),
    );
    clamp_scroll_offset(offset, max_offset)
}

fn update_scroll_offset_system(
    player: Res<PlayerEntity>,
    step_time: Res<StepTime>,
    config: Res<GameConfig>,
    map: Res<TileMap>,
    mut scroll_offset: ResMut<ScrollOffset>,
    mut stepper: Local<TimeStepper>,
    player_query: Query<(&PlayerControlled, &WorldPosition, &Physical), With<Player>>,
) {
    let tuning = &config.camera;
    let has_ticks = stepper.update_and_check(tuning.scroll_delay_ticks, step_time.ticks);

    let Ok((controls, position, physical)) = player_query.get(player.0) else {
        panic!(
            "Player entity {:?} must have Player, PlayerControlled, WorldPosition and Physical",
            player.0
        );
    };

    let max_offset = max_scroll_offset(map.width, map.height, tuning);
    let offset = next_scroll_offset(
        scroll_offset.0,
        controls,
        *position,
        physical,
        has_ticks,
        max_offset,
        tuning,
    );

    scroll_offset.set_if_neq(ScrollOffset(offset));
}

fn center_view_system(
    player: Res<PlayerEntity>,
    config: Res<GameConfig>,
    map: Res<TileMap>,
    mut center_events: EventReader<CenterViewOnPlayer>,
    mut scroll_offset: ResMut<ScrollOffset>,
    player_query: Query<(&WorldPosition, &Physical), With<Player>>,
) {
    if center_events.read().last().is_none() {
        return;
    }

    let Ok((position, physical)) = player_query.get(player.0) else {
        panic!(
            "Player entity {:?} must have Player, WorldPosition and Physical",
            player.0
        );
    };

    let tuning = &config.camera;
    let max_offset = max_scroll_offset(map.width, map.height, tuning);
    scroll_offset.0 = centered_scroll_offset(*position, physical, max_offset, tuning);
    debug!("Centered view at {:?}", scroll_offset.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Orientation;
    use crate::plugins::player::PlayerBundle;
    use proptest::prelude::*;

    const BIG_MAP: IVec2 = IVec2::new(1000, 1000);

    fn player_physical() -> Physical {
        Physical::new(BoundingBox::new(0, 0, 3, 5), true)
    }

    fn controls(state: PlayerState) -> PlayerControlled {
        PlayerControlled {
            state,
            ..PlayerControlled::facing(Orientation::Left)
        }
    }

    fn scroll(
        offset: IVec2,
        controls: &PlayerControlled,
        x: i32,
        y: i32,
        has_ticks: bool,
        max_offset: IVec2,
    ) -> IVec2 {
        next_scroll_offset(
            offset,
            controls,
            WorldPosition::new(x, y),
            &player_physical(),
            has_ticks,
            max_offset,
            &CameraTuning::default(),
        )
    }

    #[test]
    fn test_player_inside_dead_zone_keeps_offset() {
        // Default zone in world space spans x 21..=29, y 12..=28
        let offset = scroll(
            IVec2::new(10, 10),
            &controls(PlayerState::Standing),
            23,
            24,
            false,
            BIG_MAP,
        );
        assert_eq!(offset, IVec2::new(10, 10));
    }

    #[test]
    fn test_scrolls_right_by_overflow() {
        let offset = scroll(
            IVec2::ZERO,
            &controls(PlayerState::Walking),
            25,
            10,
            false,
            BIG_MAP,
        );
        // Zone right edge is 19, player right edge is 27
        assert_eq!(offset, IVec2::new(8, 0));
    }

    #[test]
    fn test_scrolls_left_by_overflow() {
        let offset = scroll(
            IVec2::new(20, 0),
            &controls(PlayerState::Walking),
            25,
            10,
            false,
            BIG_MAP,
        );
        // Zone left edge is 31
        assert_eq!(offset, IVec2::new(14, 0));
    }

    #[test]
    fn test_scrolls_down_by_overflow() {
        let offset = scroll(
            IVec2::ZERO,
            &controls(PlayerState::Standing),
            12,
            30,
            false,
            BIG_MAP,
        );
        // Zone bottom is row 18, player feet on row 30
        assert_eq!(offset, IVec2::new(0, 12));
    }

    #[test]
    fn test_climbing_uses_smaller_zone() {
        // Feet on row 15 fit the default zone but not the climbing zone (7..=12)
        let standing = scroll(
            IVec2::ZERO,
            &controls(PlayerState::Standing),
            12,
            15,
            false,
            BIG_MAP,
        );
        assert_eq!(standing, IVec2::ZERO);

        let climbing = scroll(
            IVec2::ZERO,
            &controls(PlayerState::ClimbingLadder),
            12,
            15,
            false,
            BIG_MAP,
        );
        assert_eq!(climbing, IVec2::new(0, 3));
    }

    #[test]
    fn test_scroll_clamped_to_map() {
        let tuning = CameraTuning::default();
        let max_offset = max_scroll_offset(40, 30, &tuning);
        assert_eq!(max_offset, IVec2::new(8, 10));

        let far_right = scroll(
            IVec2::ZERO,
            &controls(PlayerState::Walking),
            200,
            200,
            false,
            max_offset,
        );
        assert_eq!(far_right, IVec2::new(8, 10));

        let far_left = scroll(
            IVec2::new(8, 10),
            &controls(PlayerState::Walking),
            -50,
            -50,
            false,
            max_offset,
        );
        assert_eq!(far_left, IVec2::ZERO);
    }

    #[test]
    fn test_small_map_never_scrolls() {
        let max_offset = max_scroll_offset(10, 5, &CameraTuning::default());
        assert_eq!(max_offset, IVec2::ZERO);
        let offset = scroll(
            IVec2::ZERO,
            &controls(PlayerState::Walking),
            9,
            4,
            false,
            max_offset,
        );
        assert_eq!(offset, IVec2::ZERO);
    }

    #[test]
    fn test_look_down_nudges_on_ticks_only() {
        let mut looking_down = controls(PlayerState::Crouching);
        looking_down.is_looking_down = true;

        let gated = scroll(IVec2::new(10, 10), &looking_down, 23, 24, false, BIG_MAP);
        assert_eq!(gated, IVec2::new(10, 10));

        let nudged = scroll(IVec2::new(10, 10), &looking_down, 23, 24, true, BIG_MAP);
        assert_eq!(nudged, IVec2::new(10, 12));
    }

    #[test]
    fn test_look_up_nudge_is_clamped() {
        let mut looking_up = controls(PlayerState::LookingUp);
        looking_up.is_looking_up = true;

        let offset = scroll(IVec2::new(0, 1), &looking_up, 12, 10, true, BIG_MAP);
        assert_eq!(offset, IVec2::ZERO);
    }

    #[test]
    fn test_centered_scroll_offset() {
        let tuning = CameraTuning::default();
        let offset = centered_scroll_offset(
            WorldPosition::new(100, 60),
            &player_physical(),
            BIG_MAP,
            &tuning,
        );
        // Player x 100..=102 lands in the middle, feet on the zone bottom row 18
        assert_eq!(offset, IVec2::new(100 + 1 - 16, 60 - 18));

        let clamped = centered_scroll_offset(
            WorldPosition::new(2, 3),
            &player_physical(),
            BIG_MAP,
            &tuning,
        );
        assert_eq!(clamped, IVec2::ZERO);
    }

    fn create_test_app(position: WorldPosition) -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(CameraPlugin);

        let player = app.world.spawn(PlayerBundle::new(position, false)).id();
        app.insert_resource(TileMap::new(100, 100));
        app.insert_resource(PlayerEntity(player));

        (app, player)
    }

    #[test]
    fn test_camera_plugin_follows_player() {
        let (mut app, _player) = create_test_app(WorldPosition::new(50, 40));
        app.update();

        let offset = app.world.resource::<ScrollOffset>().0;
        // Right edge 52 against zone edge 19, feet row 40 against zone row 18
        assert_eq!(offset, IVec2::new(33, 22));
    }

    #[test]
    fn test_camera_plugin_nudge_every_second_step() {
        let (mut app, player) = create_test_app(WorldPosition::new(23, 44));
        app.insert_resource(ScrollOffset(IVec2::new(10, 30)));
        app.world
            .get_mut::<PlayerControlled>(player)
            .unwrap()
            .is_looking_down = true;

        app.update();
        assert_eq!(app.world.resource::<ScrollOffset>().0, IVec2::new(10, 30));

        app.update();
        assert_eq!(app.world.resource::<ScrollOffset>().0, IVec2::new(10, 32));
    }

    #[test]
    fn test_camera_plugin_center_view_event() {
        let (mut app, _player) = create_test_app(WorldPosition::new(60, 70));
        app.world
            .resource_mut::<Events<CenterViewOnPlayer>>()
            .send(CenterViewOnPlayer);
        app.update();

        assert_eq!(
            app.world.resource::<ScrollOffset>().0,
            IVec2::new(60 + 1 - 16, 70 - 18)
        );
    }

    #[test]
    fn test_camera_plugin_idle_without_level() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(CameraPlugin);
        app.update();
        assert_eq!(*app.world.resource::<ScrollOffset>(), ScrollOffset::default());
    }

    proptest! {
        #[test]
        fn prop_scroll_offset_stays_in_bounds(
            start_x in -50..150i32,
            start_y in -50..150i32,
            x in -200..400i32,
            y in -200..400i32,
            map_width in 1..200usize,
            map_height in 1..200usize,
            climbing in any::<bool>(),
            looking_up in any::<bool>(),
            has_ticks in any::<bool>(),
        ) {
            let tuning = CameraTuning::default();
            let max_offset = max_scroll_offset(map_width, map_height, &tuning);
            let mut state = controls(if climbing {
                PlayerState::ClimbingLadder
            } else {
                PlayerState::Standing
            });
            state.is_looking_up = looking_up;
            state.is_looking_down = !looking_up;

            let offset = scroll(IVec2::new(start_x, start_y), &state, x, y, has_ticks, max_offset);

            prop_assert!(offset.x >= 0 && offset.y >= 0);
            prop_assert!(offset.x <= max_offset.x && offset.y <= max_offset.y);
            prop_assert!(max_offset.x <= (map_width as i32 - tuning.viewport_width_tiles).max(0));
        }
    }
}
