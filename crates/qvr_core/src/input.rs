//! Controller input to game commands
//!
//! Button and trigger transitions between the previous and current
//! controller snapshots become key events. The off-hand stick moves the
//! player and the main-hand stick turns by shifting the yaw offset.

use crate::tracking::HandController;
use qvr_math::{Angles, Vec3};
use qvr_runtime::{AxisType, ButtonId, ControllerSnapshot, CONTROLLER_AXIS_COUNT};
use serde::{Deserialize, Serialize};

/// Stick values below this magnitude read as zero
pub const AXIS_DEADZONE: f32 = 0.25;

/// Trigger travel that counts as a press
pub const TRIGGER_THRESHOLD: f32 = 0.5;

/// Smooth-turn rate at turn speed 1, degrees per second per unit deflection
pub const SMOOTH_TURN_RATE: f32 = 100.0;

/// Off-hand controller index
pub const OFF_HAND: usize = 0;
/// Main-hand controller index
pub const MAIN_HAND: usize = 1;

/// Keys the mapper can press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Space,
    Shift,
    Escape,
    Enter,
    LeftArrow,
    RightArrow,
    UpArrow,
    DownArrow,
    Mouse1,
    MouseWheelUp,
    MouseWheelDown,
    Char(char),
}

/// Receives key transitions
pub trait InputSink {
    fn key_event(&mut self, key: GameKey, down: bool);
}

/// Movement accumulated into the engine's user command
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveCommand {
    pub forward: f32,
    pub side: f32,
    pub up: f32,
}

/// Engine movement speeds and the run key state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSpeeds {
    pub forward_speed: f32,
    pub up_speed: f32,
    pub move_speed_key: f32,
    /// The run key is held
    pub run: bool,
}

impl Default for MoveSpeeds {
    fn default() -> Self {
        Self {
            forward_speed: 200.0,
            up_speed: 200.0,
            move_speed_key: 2.0,
            run: false,
        }
    }
}

/// What the off-hand stick is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum MovementMode {
    /// Stick forward is where the off hand points
    #[default]
    FollowHand = 0,
    /// Stick forward is the aim direction
    RawInput = 1,
}

impl MovementMode {
    pub const MAX: i32 = 1;

    pub fn label(self) -> &'static str {
        match self {
            Self::FollowHand => "Follow hand",
            Self::RawInput => "Raw input",
        }
    }
}

impl From<i32> for MovementMode {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::RawInput,
            _ => Self::FollowHand,
        }
    }
}

impl From<MovementMode> for i32 {
    fn from(mode: MovementMode) -> Self {
        mode as i32
    }
}

/// Stick component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which controller axis slots carry the trackpad, joystick and trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisLayout {
    pub trackpad: Option<usize>,
    pub joystick: Option<usize>,
    pub trigger: Option<usize>,
}

impl AxisLayout {
    /// Take the first slot of each kind
    pub fn identify(mut axis_type: impl FnMut(usize) -> AxisType) -> Self {
        let mut layout = Self::default();
        for slot in 0..CONTROLLER_AXIS_COUNT {
            let target = match axis_type(slot) {
                AxisType::TrackPad => &mut layout.trackpad,
                AxisType::Joystick => &mut layout.joystick,
                AxisType::Trigger => &mut layout.trigger,
                AxisType::None => continue,
            };
            target.get_or_insert(slot);
        }
        layout
    }

    /// Trackpad plus joystick on one component, zeroed inside the deadzone
    pub fn axis(&self, state: &ControllerSnapshot, axis: Axis) -> f32 {
        let component = |slot: Option<usize>| {
            slot.and_then(|s| state.axes.get(s))
                .map(|v| match axis {
                    Axis::Horizontal => v.x,
                    Axis::Vertical => v.y,
                })
                .unwrap_or(0.0)
        };
        let v = component(self.trackpad) + component(self.joystick);
        if v.abs() < AXIS_DEADZONE {
            0.0
        } else {
            v
        }
    }

    /// Digital trigger state, `None` without a trigger slot
    pub fn trigger_down(&self, state: &ControllerSnapshot) -> Option<bool> {
        let slot = self.trigger?;
        state.axes.get(slot).map(|v| v.x > TRIGGER_THRESHOLD)
    }
}

/// Everything the mapper reads for one frame
#[derive(Debug, Clone, Copy)]
pub struct MoveInput<'a> {
    pub controllers: &'a [HandController; 2],
    pub layout: &'a AxisLayout,
    /// Hand orientations, off hand first
    pub hand_angles: [Angles; 2],
    pub aim: Angles,
    pub menu_active: bool,
    pub frame_time: f32,
    pub speeds: MoveSpeeds,
    pub movement_mode: MovementMode,
    /// Snap-turn step in degrees, 0 for smooth turning
    pub snap_turn: f32,
    pub turn_speed: f32,
}

/// Maps controller state to key events, movement and turning
#[derive(Debug, Default)]
pub struct InputMapper {
    last_snap: i32,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(
        &mut self,
        input: &MoveInput<'_>,
        yaw_offset: &mut f32,
        cmd: &mut MoveCommand,
        sink: &mut dyn InputSink,
    ) {
        let layout = input.layout;
        let off = &input.controllers[OFF_HAND];
        let main = &input.controllers[MAIN_HAND];

        do_trigger(layout, off, GameKey::Space, sink);

        do_key(off, ButtonId::Grip, GameKey::MouseWheelUp, sink);
        do_key(main, ButtonId::Grip, GameKey::MouseWheelDown, sink);

        do_key(off, ButtonId::Touchpad, GameKey::Shift, sink);

        do_key(off, ButtonId::ApplicationMenu, GameKey::Char('1'), sink);
        do_key(off, ButtonId::A, GameKey::Char('2'), sink);
        do_key(main, ButtonId::A, GameKey::Char('3'), sink);

        do_key(main, ButtonId::ApplicationMenu, GameKey::Escape, sink);

        if input.menu_active {
            for controller in input.controllers {
                do_axis(layout, controller, Axis::Horizontal, GameKey::LeftArrow, GameKey::RightArrow, sink);
                do_axis(layout, controller, Axis::Vertical, GameKey::DownArrow, GameKey::UpArrow, sink);
                do_trigger(layout, controller, GameKey::Enter, sink);
            }
            return;
        }

        do_trigger(layout, main, GameKey::Mouse1, sink);

        let (aim_fwd, aim_right, aim_up) = input.aim.vectors();
        let (fwd, right) = match input.movement_mode {
            MovementMode::FollowHand => {
                let (f, r, _) = input.hand_angles[OFF_HAND].vectors();
                (f, r)
            }
            MovementMode::RawInput => (aim_fwd, aim_right),
        };

        let stick = Vec3::ZERO
            .mul_add(layout.axis(&off.state, Axis::Horizontal), right)
            .mul_add(layout.axis(&off.state, Axis::Vertical), fwd);

        // Run does not change side speed, so forward speed drives all axes
        let speeds = input.speeds;
        cmd.side += speeds.forward_speed * stick.dot(aim_right);
        cmd.forward += speeds.forward_speed * stick.dot(aim_fwd);
        cmd.up += speeds.up_speed * stick.dot(aim_up);

        let always_run = speeds.forward_speed > 200.0;
        if always_run && speeds.move_speed_key != 0.0 {
            cmd.forward /= speeds.move_speed_key;
        }
        if always_run ^ speeds.run {
            cmd.forward *= speeds.move_speed_key;
            cmd.side *= speeds.move_speed_key;
            cmd.up *= speeds.move_speed_key;
        }

        let yaw_move = layout.axis(&main.state, Axis::Horizontal);
        if input.snap_turn != 0.0 {
            let snap = if yaw_move > 0.0 {
                1
            } else if yaw_move < 0.0 {
                -1
            } else {
                0
            };
            if snap != self.last_snap {
                *yaw_offset -= snap as f32 * input.snap_turn;
                self.last_snap = snap;
            }
        } else {
            *yaw_offset -= yaw_move * input.frame_time * SMOOTH_TURN_RATE * input.turn_speed;
        }
    }
}

fn do_key(controller: &HandController, button: ButtonId, key: GameKey, sink: &mut dyn InputSink) {
    let was_down = controller.last_state.is_pressed(button);
    let is_down = controller.state.is_pressed(button);
    if is_down != was_down {
        sink.key_event(key, is_down);
    }
}

fn do_trigger(layout: &AxisLayout, controller: &HandController, key: GameKey, sink: &mut dyn InputSink) {
    let (Some(was_down), Some(is_down)) = (
        layout.trigger_down(&controller.last_state),
        layout.trigger_down(&controller.state),
    ) else {
        return;
    };
    if is_down != was_down {
        sink.key_event(key, is_down);
    }
}

fn do_axis(
    layout: &AxisLayout,
    controller: &HandController,
    axis: Axis,
    negative: GameKey,
    positive: GameKey,
    sink: &mut dyn InputSink,
) {
    let last = layout.axis(&controller.last_state, axis);
    let value = layout.axis(&controller.state, axis);

    if (value > 0.0) != (last > 0.0) {
        sink.key_event(positive, value > 0.0);
    }
    if (value < 0.0) != (last < 0.0) {
        sink.key_event(negative, value < 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qvr_runtime::AxisValue;

    #[derive(Default)]
    struct Keys(Vec<(GameKey, bool)>);

    impl InputSink for Keys {
        fn key_event(&mut self, key: GameKey, down: bool) {
            self.0.push((key, down));
        }
    }

    fn layout() -> AxisLayout {
        AxisLayout {
            trackpad: None,
            joystick: Some(0),
            trigger: Some(1),
        }
    }

    /// Shift current into last and write a new current, as a frame would
    fn step(controller: &mut HandController, next: ControllerSnapshot) {
        controller.last_state = controller.state;
        controller.state = next;
    }

    fn run(mapper: &mut InputMapper, controllers: &[HandController; 2], menu: bool, yaw: &mut f32) -> (Keys, MoveCommand) {
        let layout = layout();
        let input = MoveInput {
            controllers,
            layout: &layout,
            hand_angles: [Angles::ZERO; 2],
            aim: Angles::ZERO,
            menu_active: menu,
            frame_time: 0.1,
            speeds: MoveSpeeds::default(),
            movement_mode: MovementMode::FollowHand,
            snap_turn: 0.0,
            turn_speed: 1.0,
        };
        let mut keys = Keys::default();
        let mut cmd = MoveCommand::default();
        mapper.process(&input, yaw, &mut cmd, &mut keys);
        (keys, cmd)
    }

    #[test]
    fn test_identify_takes_first_slot_of_each_kind() {
        let types = [AxisType::Joystick, AxisType::Trigger, AxisType::Trigger, AxisType::TrackPad, AxisType::None];
        let layout = AxisLayout::identify(|slot| types[slot]);
        assert_eq!(layout.joystick, Some(0));
        assert_eq!(layout.trigger, Some(1));
        assert_eq!(layout.trackpad, Some(3));
    }

    #[test]
    fn test_axis_deadzone() {
        let mut state = ControllerSnapshot::default();
        state.axes[0] = AxisValue::new(0.2, 0.3);
        assert_eq!(layout().axis(&state, Axis::Horizontal), 0.0);
        assert_eq!(layout().axis(&state, Axis::Vertical), 0.3);
    }

    #[test]
    fn test_axis_sums_trackpad_and_joystick() {
        let layout = AxisLayout {
            trackpad: Some(2),
            joystick: Some(0),
            trigger: None,
        };
        let mut state = ControllerSnapshot::default();
        state.axes[0] = AxisValue::new(0.15, 0.0);
        state.axes[2] = AxisValue::new(0.15, 0.0);
        assert_abs_diff_eq!(layout.axis(&state, Axis::Horizontal), 0.3, epsilon = 1e-6);
        assert_eq!(layout.trigger_down(&state), None);
    }

    #[test]
    fn test_held_button_fires_once() {
        let mut mapper = InputMapper::new();
        let mut controllers = [HandController::default(), HandController::default()];
        let mut pressed = ControllerSnapshot::default();
        pressed.press(ButtonId::Grip);
        let mut yaw = 0.0;

        step(&mut controllers[0], pressed);
        let (keys, _) = run(&mut mapper, &controllers, false, &mut yaw);
        assert_eq!(keys.0, vec![(GameKey::MouseWheelUp, true)]);

        step(&mut controllers[0], pressed);
        let (keys, _) = run(&mut mapper, &controllers, false, &mut yaw);
        assert!(keys.0.is_empty());

        step(&mut controllers[0], ControllerSnapshot::default());
        let (keys, _) = run(&mut mapper, &controllers, false, &mut yaw);
        assert_eq!(keys.0, vec![(GameKey::MouseWheelUp, false)]);
    }

    #[test]
    fn test_main_trigger_fires_outside_menu() {
        let mut mapper = InputMapper::new();
        let mut controllers = [HandController::default(), HandController::default()];
        let mut pulled = ControllerSnapshot::default();
        pulled.axes[1] = AxisValue::new(0.8, 0.0);
        step(&mut controllers[1], pulled);
        let mut yaw = 0.0;

        let (keys, _) = run(&mut mapper, &controllers, false, &mut yaw);
        assert_eq!(keys.0, vec![(GameKey::Mouse1, true)]);

        let (keys, _) = run(&mut mapper, &controllers, true, &mut yaw);
        assert_eq!(keys.0, vec![(GameKey::Enter, true)]);
    }

    #[test]
    fn test_menu_sticks_produce_arrows() {
        let mut mapper = InputMapper::new();
        let mut controllers = [HandController::default(), HandController::default()];
        let mut pushed = ControllerSnapshot::default();
        pushed.axes[0] = AxisValue::new(-0.9, 0.6);
        step(&mut controllers[0], pushed);
        let mut yaw = 0.0;

        let (keys, cmd) = run(&mut mapper, &controllers, true, &mut yaw);
        assert_eq!(
            keys.0,
            vec![(GameKey::LeftArrow, true), (GameKey::UpArrow, true)]
        );
        assert_eq!(cmd, MoveCommand::default());
    }

    #[test]
    fn test_stick_moves_forward() {
        let mut mapper = InputMapper::new();
        let mut controllers = [HandController::default(), HandController::default()];
        let mut pushed = ControllerSnapshot::default();
        pushed.axes[0] = AxisValue::new(0.0, 1.0);
        step(&mut controllers[0], pushed);
        let mut yaw = 0.0;

        let (_, cmd) = run(&mut mapper, &controllers, false, &mut yaw);
        assert_abs_diff_eq!(cmd.forward, 200.0, epsilon = 1e-3);
        assert_abs_diff_eq!(cmd.side, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_smooth_turn() {
        let mut mapper = InputMapper::new();
        let mut controllers = [HandController::default(), HandController::default()];
        let mut pushed = ControllerSnapshot::default();
        pushed.axes[0] = AxisValue::new(0.5, 0.0);
        step(&mut controllers[1], pushed);
        let mut yaw = 0.0;

        run(&mut mapper, &controllers, false, &mut yaw);
        assert_abs_diff_eq!(yaw, -5.0, epsilon = 1e-4);
    }
}
