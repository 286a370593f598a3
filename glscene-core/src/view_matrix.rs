/// View-transform builders producing 4x4 matrices in column-major GL layout
use nalgebra::Matrix4;

/// Build a matrix from its 16 elements in column-major order, so that
/// `m[i]` matches the linear index a GL uniform upload sees.
fn from_gl_elements(elements: [f32; 16]) -> Matrix4<f32> {
    Matrix4::from_column_slice(&elements)
}

/// Frustum (3D rectangular region of space) matrix.
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Matrix4<f32> {
    from_gl_elements([
        (2.0 * near) / (right - left),
        0.0,
        0.0,
        0.0,
        //
        0.0,
        (2.0 * near) / (top - bottom),
        0.0,
        0.0,
        //
        (right + left) / (right - left),
        (top + bottom) / (top - bottom),
        -(far + near) / (far - near),
        -1.0,
        //
        0.0,
        0.0,
        -(2.0 * far * near) / (far - near),
        0.0,
    ])
}

/// Orthographic matrix centred at (0, 0).
pub fn orthographic(width: f32, height: f32, near: f32, far: f32) -> Matrix4<f32> {
    from_gl_elements([
        1.0 / width,
        0.0,
        0.0,
        0.0,
        //
        0.0,
        1.0 / height,
        0.0,
        0.0,
        //
        0.0,
        0.0,
        -2.0 / (far - near),
        0.0,
        //
        0.0,
        0.0,
        -near / (far - near),
        1.0,
    ])
}

/// General orthographic matrix over an arbitrary rectangle.
pub fn orthographic_rect(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Matrix4<f32> {
    from_gl_elements([
        2.0 / (right - left),
        0.0,
        0.0,
        0.0,
        //
        0.0,
        2.0 / (top - bottom),
        0.0,
        0.0,
        //
        0.0,
        0.0,
        -2.0 / (far - near),
        0.0,
        //
        -(right + left) / (right - left),
        -(top + bottom) / (top - bottom),
        -(far + near) / (far - near),
        1.0,
    ])
}

/// Symmetric frustum bounds `(left, right, bottom, top)` for a vertical
/// field of view given in degrees.
pub fn perspective_bounds(fov_y: f32, aspect: f32, near: f32) -> (f32, f32, f32, f32) {
    let top = near * (fov_y * (std::f32::consts::PI / 360.0)).tan();
    let bottom = -top;
    let left = bottom * aspect;
    let right = top * aspect;
    (left, right, bottom, top)
}

/// Perspective projection. `fov_y` is in degrees.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let (left, right, bottom, top) = perspective_bounds(fov_y, aspect, near);
    frustum(left, right, bottom, top, near, far)
}

/// Viewport matrix mapping normalized device coordinates onto the
/// rectangle at `(x, y)` of size `width` x `height`.
pub fn viewport(x: f32, y: f32, width: f32, height: f32) -> Matrix4<f32> {
    from_gl_elements([
        width * 0.5,
        0.0,
        0.0,
        0.0,
        //
        0.0,
        height * 0.5,
        0.0,
        0.0,
        //
        0.0,
        0.0,
        1.0,
        0.0,
        //
        x + width * 0.5,
        y + height * 0.5,
        0.0,
        1.0,
    ])
}
