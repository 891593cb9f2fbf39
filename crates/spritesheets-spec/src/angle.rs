//! Fixed camera angles a sprite sheet is rendered from.

/// Number of camera angles per sheet.
pub const ANGLE_COUNT: u32 = 8;

/// Degrees between consecutive camera angles.
pub const ANGLE_STEP_DEGREES: u32 = 45;

/// Yields the camera angles in render order: 0, 45, ..., 315.
pub fn angles() -> impl Iterator<Item = u32> {
    (0..ANGLE_COUNT).map(|index| index * ANGLE_STEP_DEGREES)
}

/// Returns true if `angle` is one of the fixed camera angles.
pub fn is_sheet_angle(angle: u32) -> bool {
    angle < ANGLE_COUNT * ANGLE_STEP_DEGREES && angle % ANGLE_STEP_DEGREES == 0
}

/// Converts an angle in degrees to the Z rotation (radians) of the camera root.
pub fn to_radians(angle: u32) -> f64 {
    f64::from(angle).to_radians()
}
