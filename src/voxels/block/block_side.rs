//! # Block Side Module
//!
//! This module defines the six faces of a voxel block together with the static
//! face geometry table: the untranslated corner vertices of each face of a unit
//! cube centred on the origin.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value which is used to index the
/// per-face tables (geometry, atlas slots and a block's cached face data).
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

/// Corner vertices of every face of a unit cube centred on the origin, indexed by
/// `BlockSide as usize`.
///
/// Each quad is listed top-left, top-right, bottom-right, bottom-left as seen from
/// outside the cube. With the `[0, 1, 2, 2, 3, 0]` index fan every face is wound
/// clockwise when viewed from outside, so consumers cull with a clockwise front face.
static RAW_FACE_VERTICES: [[[f32; 3]; 4]; 6] = [
    // FRONT
    [
        [-0.5, 0.5, 0.5],
        [0.5, 0.5, 0.5],
        [0.5, -0.5, 0.5],
        [-0.5, -0.5, 0.5],
    ],
    // BACK
    [
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
    ],
    // BOTTOM
    [
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, -0.5, -0.5],
        [-0.5, -0.5, -0.5],
    ],
    // TOP
    [
        [-0.5, 0.5, -0.5],
        [0.5, 0.5, -0.5],
        [0.5, 0.5, 0.5],
        [-0.5, 0.5, 0.5],
    ],
    // LEFT
    [
        [-0.5, 0.5, -0.5],
        [-0.5, 0.5, 0.5],
        [-0.5, -0.5, 0.5],
        [-0.5, -0.5, -0.5],
    ],
    // RIGHT
    [
        [0.5, 0.5, 0.5],
        [0.5, 0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, -0.5, 0.5],
    ],
];

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// This is the order in which the mesher visits the faces of a block.
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// Returns the four untranslated corner vertices of this face.
    ///
    /// # Returns
    /// The corners in top-left, top-right, bottom-right, bottom-left order.
    pub fn vertices(self) -> [Vector3<f32>; 4] {
        RAW_FACE_VERTICES[self as usize].map(Vector3::from)
    }

    /// The outward unit normal of this face, which is also the offset from a
    /// block to the neighbour that can hide this face.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
        }
    }
}
