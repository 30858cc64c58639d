//! Integration tests for the runtime boundary

use approx::assert_relative_eq;
use qvr_math::{Quat, Vec3, Vec4};
use qvr_runtime::prelude::*;

#[test]
fn test_usable_as_trait_object() {
    let mut runtime: Box<dyn TrackingRuntime> = Box::new(MockRuntime::new());
    assert_eq!(runtime.name(), "mock");
    assert!(!runtime.is_initialized());

    runtime.init().unwrap();
    runtime.set_tracking_space(TrackingSpace::Standing);
    let poses = runtime.wait_for_poses().unwrap();

    let hmds = poses
        .iter()
        .enumerate()
        .filter(|(i, p)| p.valid && runtime.device_class(*i) == DeviceClass::Hmd)
        .count();
    assert_eq!(hmds, 1);

    runtime.shutdown();
    assert!(!runtime.is_initialized());
}

#[test]
fn test_scripted_pose_is_reported() {
    let mut runtime = MockRuntime::new();
    runtime.init().unwrap();
    runtime.set_pose(MockRuntime::HMD, Quat::IDENTITY, Vec3::new(0.1, 1.7, -0.4));
    runtime.set_pose_valid(MockRuntime::LEFT_CONTROLLER, false);

    let poses = runtime.wait_for_poses().unwrap();
    assert_eq!(poses[MockRuntime::HMD].device_to_tracking.translation(), Vec3::new(0.1, 1.7, -0.4));
    assert!(!poses[MockRuntime::LEFT_CONTROLLER].valid);
}

#[test]
fn test_added_device_gets_next_index() {
    let mut runtime = MockRuntime::new();
    let tracker = runtime.add_device(DeviceClass::TrackingReference, ControllerRole::Invalid);
    assert_eq!(tracker, 3);
    assert_eq!(runtime.device_class(tracker), DeviceClass::TrackingReference);
}

#[test]
fn test_projection_maps_far_plane_to_w() {
    let runtime = MockRuntime::new();
    let far = 16384.0;
    let proj = runtime.projection_matrix(Eye::Left, 4.0, far).to_mat4();

    let clip = proj * Vec4::new(0.0, 0.0, -far, 1.0);
    assert_relative_eq!(clip.z / clip.w, 1.0, epsilon = 1e-3);

    let clip = proj * Vec4::new(0.0, 0.0, -4.0, 1.0);
    assert_relative_eq!(clip.w, 4.0, epsilon = 1e-4);
}

#[test]
fn test_controller_axes_and_buttons() {
    let mut runtime = MockRuntime::new();
    let state = runtime
        .controller_state_mut(MockRuntime::RIGHT_CONTROLLER)
        .unwrap();
    state.press(ButtonId::Trigger);
    state.axes[1] = AxisValue::new(1.0, 0.0);

    let snapshot = runtime.controller_state(MockRuntime::RIGHT_CONTROLLER).unwrap();
    assert!(snapshot.is_pressed(ButtonId::Trigger));
    assert!(!snapshot.is_pressed(ButtonId::Grip));
    assert_eq!(runtime.controller_state(MockRuntime::HMD), None);
}
