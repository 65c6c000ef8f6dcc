//! Host parameter block and parameter identifiers.

use core::fmt;

use tonewheel_core::pitch::{join_pitch, split_pitch};

/// Per-call parameter block handed over by the host on render and note events.
///
/// `pitch` packs the note number in the high byte and a fine offset
/// (0..=255, one semitone) in the low byte. The remaining fields are carried
/// for completeness; this oscillator only reads `pitch`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct OscParams {
    pub shape_lfo: i32,
    pub pitch: u16,
    pub cutoff: u16,
    pub resonance: u16,
}

impl OscParams {
    #[inline]
    pub fn from_note(note: u8, fine: u8) -> Self {
        Self { pitch: join_pitch(note, fine), ..Self::default() }
    }

    #[inline] pub fn note(&self) -> u8 { split_pitch(self.pitch).0 }
    #[inline] pub fn fine(&self) -> u8 { split_pitch(self.pitch).1 }
}

/// Parameter slots the host can address.
///
/// The six drawbar parameters take raw values 0..=8; shape and shift-shape
/// take 10-bit values 0..=1023.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    Drawbar1,
    Drawbar2,
    Drawbar3,
    Drawbar4,
    Drawbar5,
    Drawbar6,
    /// Key click level.
    Shape,
    /// Percussion level and harmonic (sign selects the harmonic).
    ShiftShape,
}

impl ParamId {
    pub const ALL: [ParamId; 8] = [
        ParamId::Drawbar1,
        ParamId::Drawbar2,
        ParamId::Drawbar3,
        ParamId::Drawbar4,
        ParamId::Drawbar5,
        ParamId::Drawbar6,
        ParamId::Shape,
        ParamId::ShiftShape,
    ];

    /// Host-side index of this parameter.
    #[inline]
    pub fn index(self) -> u16 {
        match self {
            ParamId::Drawbar1 => 0,
            ParamId::Drawbar2 => 1,
            ParamId::Drawbar3 => 2,
            ParamId::Drawbar4 => 3,
            ParamId::Drawbar5 => 4,
            ParamId::Drawbar6 => 5,
            ParamId::Shape => 6,
            ParamId::ShiftShape => 7,
        }
    }

    /// Harmonic slot driven by a drawbar parameter.
    ///
    /// Drawbars 2 and 3 are crossed: drawbar 2 drives slot 3 and drawbar 3
    /// drives slot 2, following the footage order on the panel.
    #[inline]
    pub fn drawbar_slot(self) -> Option<usize> {
        match self {
            ParamId::Drawbar1 => Some(1),
            ParamId::Drawbar2 => Some(3),
            ParamId::Drawbar3 => Some(2),
            ParamId::Drawbar4 => Some(4),
            ParamId::Drawbar5 => Some(5),
            ParamId::Drawbar6 => Some(6),
            ParamId::Shape | ParamId::ShiftShape => None,
        }
    }
}

/// Index that names no parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownParam(pub u16);

impl fmt::Display for UnknownParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown parameter index {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownParam {}

impl TryFrom<u16> for ParamId {
    type Error = UnknownParam;

    fn try_from(index: u16) -> Result<Self, Self::Error> {
        ParamId::ALL
            .iter()
            .copied()
            .find(|p| p.index() == index)
            .ok_or(UnknownParam(index))
    }
}
