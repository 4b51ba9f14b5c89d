use super::affine_transform::AffineTransform;

/// How a frame's stored pixels must be rotated and mirrored to appear upright.
///
/// Rotations are clockwise as seen on a top-left-origin display. The
/// mirrored variants flip the stored pixels horizontally before rotating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Identity,
    Rotated180,
    Rotated90Cw,
    Rotated90Ccw,
    Mirrored,
    Rotated180Mirrored,
    Rotated90CwMirrored,
    Rotated90CcwMirrored,
}

/// First transform stage: undo the rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationStage {
    None,
    /// translate (w, h), rotate π
    HalfTurn,
    /// translate (w, 0), rotate π/2
    QuarterTurnCw,
    /// translate (0, h), rotate -π/2
    QuarterTurnCcw,
}

/// Second transform stage: undo the mirroring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirrorStage {
    None,
    /// translate (w, 0), scale (-1, 1)
    FlipAcrossWidth,
    /// translate (h, 0), scale (-1, 1); the axes are already swapped
    FlipAcrossHeight,
}

/// The lookup-table row for one orientation tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrientationStages {
    pub rotation: RotationStage,
    pub mirror: MirrorStage,
    pub swaps_axes: bool,
}

const fn stages(rotation: RotationStage, mirror: MirrorStage, swaps_axes: bool) -> OrientationStages {
    OrientationStages {
        rotation,
        mirror,
        swaps_axes,
    }
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::Identity,
        Orientation::Rotated180,
        Orientation::Rotated90Cw,
        Orientation::Rotated90Ccw,
        Orientation::Mirrored,
        Orientation::Rotated180Mirrored,
        Orientation::Rotated90CwMirrored,
        Orientation::Rotated90CcwMirrored,
    ];

    pub fn stages(self) -> OrientationStages {
        use MirrorStage as M;
        use RotationStage as R;
        match self {
            Orientation::Identity => stages(R::None, M::None, false),
            Orientation::Rotated180 => stages(R::HalfTurn, M::None, false),
            Orientation::Rotated90Cw => stages(R::QuarterTurnCw, M::None, true),
            Orientation::Rotated90Ccw => stages(R::QuarterTurnCcw, M::None, true),
            Orientation::Mirrored => stages(R::None, M::FlipAcrossWidth, false),
            Orientation::Rotated180Mirrored => stages(R::HalfTurn, M::FlipAcrossWidth, false),
            Orientation::Rotated90CwMirrored => stages(R::QuarterTurnCw, M::FlipAcrossHeight, true),
            Orientation::Rotated90CcwMirrored => {
                stages(R::QuarterTurnCcw, M::FlipAcrossHeight, true)
            }
        }
    }

    pub fn is_identity(self) -> bool {
        self == Orientation::Identity
    }

    pub fn swaps_axes(self) -> bool {
        self.stages().swaps_axes
    }

    /// Upright `(width, height)` of a frame stored as `width x height`.
    pub fn canonical_size(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_axes() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Maps the stored image, drawn at `(0, 0, width, height)`, onto the
    /// upright canvas. `width` and `height` are the stored dimensions.
    pub fn transform(self, width: u32, height: u32) -> AffineTransform {
        let (canvas_w, canvas_h) = self.canonical_size(width, height);
        let (w, h) = (canvas_w as f64, canvas_h as f64);
        let stages = self.stages();

        let rotated = match stages.rotation {
            RotationStage::None => AffineTransform::IDENTITY,
            RotationStage::HalfTurn => AffineTransform::IDENTITY
                .translated_by(w, h)
                .rotated_by(std::f64::consts::PI),
            RotationStage::QuarterTurnCw => AffineTransform::IDENTITY
                .translated_by(w, 0.0)
                .rotated_by(std::f64::consts::FRAC_PI_2),
            RotationStage::QuarterTurnCcw => AffineTransform::IDENTITY
                .translated_by(0.0, h)
                .rotated_by(-std::f64::consts::FRAC_PI_2),
        };

        match stages.mirror {
            MirrorStage::None => rotated,
            MirrorStage::FlipAcrossWidth => rotated.translated_by(w, 0.0).scaled_by(-1.0, 1.0),
            MirrorStage::FlipAcrossHeight => rotated.translated_by(h, 0.0).scaled_by(-1.0, 1.0),
        }
    }
}
