//! Vector, color and pose records.
//!
//! These are plain sequences of scalar fields, in declaration order, with no header or
//! padding. The 8-bit color encodings store each channel as `round(c * 255)`, clamped to
//! `[0, 255]`, and decode it as `byte / 255`.

use crate::{BinaryReader, BinaryWriter, Result};

/// A 2-component vector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Vector2<T> {
    pub x: T,
    pub y: T,
}

/// A 3-component vector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

/// A 4-component vector.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Vector4<T> {
    pub x: T,
    pub y: T,
    pub z: T,
    pub w: T,
}

/// An RGB color with channels in `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Color3 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// An RGBA color with channels in `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// A position followed by Euler-style rotation angles. Encoded as 6 `f32` values:
/// position x, y, z, then rotation x, y, z.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
}

/// A scalar type that vectors can be encoded with: `f32`, `i16` or `i32`.
pub trait Component: Copy + sealed::Sealed {
    /// Reads one component.
    fn read(r: &mut BinaryReader<'_>) -> Result<Self>;
    /// Writes one component.
    fn write(self, w: &mut BinaryWriter);
}

impl Component for f32 {
    fn read(r: &mut BinaryReader<'_>) -> Result<Self> {
        r.read_f32()
    }
    fn write(self, w: &mut BinaryWriter) {
        w.write_f32(self)
    }
}

impl Component for i16 {
    fn read(r: &mut BinaryReader<'_>) -> Result<Self> {
        r.read_i16()
    }
    fn write(self, w: &mut BinaryWriter) {
        w.write_i16(self)
    }
}

impl Component for i32 {
    fn read(r: &mut BinaryReader<'_>) -> Result<Self> {
        r.read_i32()
    }
    fn write(self, w: &mut BinaryWriter) {
        w.write_i32(self)
    }
}

/// Scales a `[0, 1]` channel to a byte. Out-of-range inputs saturate and NaN becomes 0.
pub(crate) fn unit_to_byte(c: f32) -> u8 {
    let scaled = (f64::from(c) * 255.0).clamp(0.0, 255.0);
    // Round half up, then truncate; `as` maps NaN to 0.
    (scaled + 0.5) as u8
}

pub(crate) fn byte_to_unit(b: u8) -> f32 {
    f32::from(b) / 255.0
}

impl BinaryReader<'_> {
    /// Reads a [`Vector2`] of `f32`, `i16` or `i32` components.
    pub fn read_vector2<T: Component>(&mut self) -> Result<Vector2<T>> {
        self.restoring(|r| {
            Ok(Vector2 {
                x: T::read(r)?,
                y: T::read(r)?,
            })
        })
    }

    /// Reads a [`Vector3`] of `f32`, `i16` or `i32` components.
    pub fn read_vector3<T: Component>(&mut self) -> Result<Vector3<T>> {
        self.restoring(|r| {
            Ok(Vector3 {
                x: T::read(r)?,
                y: T::read(r)?,
                z: T::read(r)?,
            })
        })
    }

    /// Reads a [`Vector4`] of `f32`, `i16` or `i32` components.
    pub fn read_vector4<T: Component>(&mut self) -> Result<Vector4<T>> {
        self.restoring(|r| {
            Ok(Vector4 {
                x: T::read(r)?,
                y: T::read(r)?,
                z: T::read(r)?,
                w: T::read(r)?,
            })
        })
    }

    /// Reads a [`Color3`] stored as three `f32` channels.
    pub fn read_color3_f32(&mut self) -> Result<Color3> {
        let Vector3 { x, y, z } = self.read_vector3::<f32>()?;
        Ok(Color3 { r: x, g: y, b: z })
    }

    /// Reads a [`Color3`] stored as three bytes.
    pub fn read_color3_u8(&mut self) -> Result<Color3> {
        let [r, g, b] = self.read_cbytes()?;
        Ok(Color3 {
            r: byte_to_unit(r),
            g: byte_to_unit(g),
            b: byte_to_unit(b),
        })
    }

    /// Reads a [`Color4`] stored as four `f32` channels.
    pub fn read_color4_f32(&mut self) -> Result<Color4> {
        let Vector4 { x, y, z, w } = self.read_vector4::<f32>()?;
        Ok(Color4 {
            r: x,
            g: y,
            b: z,
            a: w,
        })
    }

    /// Reads a [`Color4`] stored as four bytes.
    pub fn read_color4_u8(&mut self) -> Result<Color4> {
        let [r, g, b, a] = self.read_cbytes()?;
        Ok(Color4 {
            r: byte_to_unit(r),
            g: byte_to_unit(g),
            b: byte_to_unit(b),
            a: byte_to_unit(a),
        })
    }

    /// Reads a [`Pose`].
    pub fn read_pose(&mut self) -> Result<Pose> {
        self.restoring(|r| {
            Ok(Pose {
                position: r.read_vector3()?,
                rotation: r.read_vector3()?,
            })
        })
    }
}

impl BinaryWriter {
    /// Writes a [`Vector2`] as its components in order.
    pub fn write_vector2<T: Component>(&mut self, v: Vector2<T>) {
        v.x.write(self);
        v.y.write(self);
    }

    /// Writes a [`Vector3`] as its components in order.
    pub fn write_vector3<T: Component>(&mut self, v: Vector3<T>) {
        v.x.write(self);
        v.y.write(self);
        v.z.write(self);
    }

    /// Writes a [`Vector4`] as its components in order.
    pub fn write_vector4<T: Component>(&mut self, v: Vector4<T>) {
        v.x.write(self);
        v.y.write(self);
        v.z.write(self);
        v.w.write(self);
    }

    /// Writes a [`Color3`] as three `f32` channels.
    pub fn write_color3_f32(&mut self, c: Color3) {
        self.write_f32(c.r);
        self.write_f32(c.g);
        self.write_f32(c.b);
    }

    /// Writes a [`Color3`] as three bytes.
    pub fn write_color3_u8(&mut self, c: Color3) {
        self.write_cbytes([unit_to_byte(c.r), unit_to_byte(c.g), unit_to_byte(c.b)]);
    }

    /// Writes a [`Color4`] as four `f32` channels.
    pub fn write_color4_f32(&mut self, c: Color4) {
        self.write_f32(c.r);
        self.write_f32(c.g);
        self.write_f32(c.b);
        self.write_f32(c.a);
    }

    /// Writes a [`Color4`] as four bytes.
    pub fn write_color4_u8(&mut self, c: Color4) {
        self.write_cbytes([
            unit_to_byte(c.r),
            unit_to_byte(c.g),
            unit_to_byte(c.b),
            unit_to_byte(c.a),
        ]);
    }

    /// Writes a [`Pose`]: position, then rotation.
    pub fn write_pose(&mut self, p: Pose) {
        self.write_vector3(p.position);
        self.write_vector3(p.rotation);
    }
}
