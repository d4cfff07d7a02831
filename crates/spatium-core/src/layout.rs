//! Speaker layout model.
//!
//! Every layout the renderer understands is a variant of [`SpeakerLayout`]. Layouts
//! fall into four families:
//!
//! - **Beds**: discrete loudspeaker layouts from mono up to 22.2.
//! - **Expanded**: a named subset of a larger base bed (e.g. only the side-surround
//!   pair of 7.1.4). These carry fewer channels than their base and are scattered
//!   into the base slots before any matrix is applied.
//! - **Scenes**: ambisonic orders 1 to 7 in ACN channel order.
//! - **Binaural**: a two-channel headphone feed.
//!
//! All queries are pure lookups over static tables.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::channel::{acn_sequence, ChannelType};
use crate::{Error, Result};

use ChannelType::*;

const MONO: [ChannelType; 1] = [Mono];
const STEREO: [ChannelType; 2] = [FrontLeft, FrontRight];
const SURROUND_3_1_2: [ChannelType; 6] = [
    FrontLeft,
    FrontRight,
    FrontCentre,
    Lfe1,
    TopFrontLeft,
    TopFrontRight,
];
const SURROUND_5_1: [ChannelType; 6] = [
    FrontLeft,
    FrontRight,
    FrontCentre,
    Lfe1,
    SurroundLeft,
    SurroundRight,
];
const SURROUND_5_1_2: [ChannelType; 8] = [
    FrontLeft,
    FrontRight,
    FrontCentre,
    Lfe1,
    SurroundLeft,
    SurroundRight,
    TopFrontLeft,
    TopFrontRight,
];
const SURROUND_5_1_4: [ChannelType; 10] = [
    FrontLeft,
    FrontRight,
    FrontCentre,
    Lfe1,
    SurroundLeft,
    SurroundRight,
    TopFrontLeft,
    TopFrontRight,
    TopBackLeft,
    TopBackRight,
];
const SURROUND_7_1: [ChannelType; 8] = [
    FrontLeft,
    FrontRight,
    FrontCentre,
    Lfe1,
    SideLeft,
    SideRight,
    BackLeft,
    BackRight,
];
const SURROUND_7_1_2: [ChannelType; 10] = [
    FrontLeft,
    FrontRight,
    FrontCentre,
    Lfe1,
    SideLeft,
    SideRight,
    BackLeft,
    BackRight,
    TopFrontLeft,
    TopFrontRight,
];
const SURROUND_7_1_4: [ChannelType; 12] = [
    FrontLeft,
    FrontRight,
    FrontCentre,
    Lfe1,
    SideLeft,
    SideRight,
    BackLeft,
    BackRight,
    TopFrontLeft,
    TopFrontRight,
    TopBackLeft,
    TopBackRight,
];
const SURROUND_9_1_6: [ChannelType; 16] = [
    WideLeft,
    WideRight,
    FrontCentre,
    Lfe1,
    BackLeft,
    BackRight,
    FrontLeft,
    FrontRight,
    SideLeft,
    SideRight,
    TopFrontLeft,
    TopFrontRight,
    TopBackLeft,
    TopBackRight,
    TopSideLeft,
    TopSideRight,
];
/// ITU-R BS.2051 System H.
const SURROUND_22_2: [ChannelType; 24] = [
    WideLeft,
    WideRight,
    FrontCentre,
    Lfe1,
    BackLeft,
    BackRight,
    FrontLeft,
    FrontRight,
    BackCentre,
    Lfe2,
    SideLeft,
    SideRight,
    TopFrontLeft,
    TopFrontRight,
    TopFrontCentre,
    TopCentre,
    TopBackLeft,
    TopBackRight,
    TopSideLeft,
    TopSideRight,
    TopBackCentre,
    BottomFrontCentre,
    BottomFrontLeft,
    BottomFrontRight,
];

const EXPL_LFE: [ChannelType; 1] = [Lfe1];
const EXPL_STEREO_S: [ChannelType; 2] = [SurroundLeft, SurroundRight];
const EXPL_STEREO_SS: [ChannelType; 2] = [SideLeft, SideRight];
const EXPL_STEREO_RS: [ChannelType; 2] = [BackLeft, BackRight];
const EXPL_STEREO_TF: [ChannelType; 2] = [TopFrontLeft, TopFrontRight];
const EXPL_STEREO_TB: [ChannelType; 2] = [TopBackLeft, TopBackRight];
const EXPL_TOP_4: [ChannelType; 4] = [TopFrontLeft, TopFrontRight, TopBackLeft, TopBackRight];
const EXPL_FRONT_3: [ChannelType; 3] = [FrontLeft, FrontRight, FrontCentre];
const EXPL_STEREO_F: [ChannelType; 2] = [WideLeft, WideRight];
const EXPL_STEREO_SI: [ChannelType; 2] = [SideLeft, SideRight];
const EXPL_STEREO_TPSI: [ChannelType; 2] = [TopSideLeft, TopSideRight];
const EXPL_TOP_6: [ChannelType; 6] = [
    TopFrontLeft,
    TopFrontRight,
    TopSideLeft,
    TopSideRight,
    TopBackLeft,
    TopBackRight,
];

const BINAURAL: [ChannelType; 2] = [BinauralLeft, BinauralRight];

const HOA1: [ChannelType; 4] = acn_sequence();
const HOA2: [ChannelType; 9] = acn_sequence();
const HOA3: [ChannelType; 16] = acn_sequence();
const HOA4: [ChannelType; 25] = acn_sequence();
const HOA5: [ChannelType; 36] = acn_sequence();
const HOA6: [ChannelType; 49] = acn_sequence();
const HOA7: [ChannelType; 64] = acn_sequence();

/// Broad family a layout belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Bed,
    Expanded,
    Scene,
    Binaural,
}

/// A channel or scene layout.
///
/// Layouts are plain values: compared by identity, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpeakerLayout {
    Mono,
    Stereo,
    Surround3_1_2,
    Surround5_1,
    Surround5_1_2,
    Surround5_1_4,
    Surround7_1,
    Surround7_1_2,
    Surround7_1_4,
    Surround9_1_6,
    Surround22_2,

    /// LFE of 7.1.4.
    ExplLfe,
    /// Ls/Rs of 5.1.4.
    ExplStereoS,
    /// Side surrounds of 7.1.4.
    ExplStereoSs,
    /// Rear surrounds of 7.1.4.
    ExplStereoRs,
    /// Top-front pair of 7.1.4.
    ExplStereoTf,
    /// Top-back pair of 7.1.4.
    ExplStereoTb,
    /// The four tops of 7.1.4.
    ExplTop4,
    /// L/R/C of 7.1.4.
    ExplFront3,
    /// Wide front pair of 9.1.6.
    ExplStereoF,
    /// Side pair of 9.1.6.
    ExplStereoSi,
    /// Top-side pair of 9.1.6.
    ExplStereoTpSi,
    /// The six tops of 9.1.6.
    ExplTop6,

    Hoa1,
    Hoa2,
    Hoa3,
    Hoa4,
    Hoa5,
    Hoa6,
    Hoa7,

    Binaural,
}

impl SpeakerLayout {
    /// Discrete loudspeaker beds, every one of which is present in the gain table.
    pub const BEDS: [SpeakerLayout; 11] = [
        SpeakerLayout::Mono,
        SpeakerLayout::Stereo,
        SpeakerLayout::Surround3_1_2,
        SpeakerLayout::Surround5_1,
        SpeakerLayout::Surround5_1_2,
        SpeakerLayout::Surround5_1_4,
        SpeakerLayout::Surround7_1,
        SpeakerLayout::Surround7_1_2,
        SpeakerLayout::Surround7_1_4,
        SpeakerLayout::Surround9_1_6,
        SpeakerLayout::Surround22_2,
    ];

    pub const EXPANDED: [SpeakerLayout; 12] = [
        SpeakerLayout::ExplLfe,
        SpeakerLayout::ExplStereoS,
        SpeakerLayout::ExplStereoSs,
        SpeakerLayout::ExplStereoRs,
        SpeakerLayout::ExplStereoTf,
        SpeakerLayout::ExplStereoTb,
        SpeakerLayout::ExplTop4,
        SpeakerLayout::ExplFront3,
        SpeakerLayout::ExplStereoF,
        SpeakerLayout::ExplStereoSi,
        SpeakerLayout::ExplStereoTpSi,
        SpeakerLayout::ExplTop6,
    ];

    pub const SCENES: [SpeakerLayout; 7] = [
        SpeakerLayout::Hoa1,
        SpeakerLayout::Hoa2,
        SpeakerLayout::Hoa3,
        SpeakerLayout::Hoa4,
        SpeakerLayout::Hoa5,
        SpeakerLayout::Hoa6,
        SpeakerLayout::Hoa7,
    ];

    /// Every layout, in declaration order.
    pub fn all() -> impl Iterator<Item = SpeakerLayout> {
        Self::BEDS
            .into_iter()
            .chain(Self::EXPANDED)
            .chain(Self::SCENES)
            .chain(core::iter::once(SpeakerLayout::Binaural))
    }

    /// ITU channel ordering of this layout.
    pub fn channel_order(&self) -> &'static [ChannelType] {
        use SpeakerLayout::*;
        match self {
            Mono => &MONO,
            Stereo => &STEREO,
            Surround3_1_2 => &SURROUND_3_1_2,
            Surround5_1 => &SURROUND_5_1,
            Surround5_1_2 => &SURROUND_5_1_2,
            Surround5_1_4 => &SURROUND_5_1_4,
            Surround7_1 => &SURROUND_7_1,
            Surround7_1_2 => &SURROUND_7_1_2,
            Surround7_1_4 => &SURROUND_7_1_4,
            Surround9_1_6 => &SURROUND_9_1_6,
            Surround22_2 => &SURROUND_22_2,
            ExplLfe => &EXPL_LFE,
            ExplStereoS => &EXPL_STEREO_S,
            ExplStereoSs => &EXPL_STEREO_SS,
            ExplStereoRs => &EXPL_STEREO_RS,
            ExplStereoTf => &EXPL_STEREO_TF,
            ExplStereoTb => &EXPL_STEREO_TB,
            ExplTop4 => &EXPL_TOP_4,
            ExplFront3 => &EXPL_FRONT_3,
            ExplStereoF => &EXPL_STEREO_F,
            ExplStereoSi => &EXPL_STEREO_SI,
            ExplStereoTpSi => &EXPL_STEREO_TPSI,
            ExplTop6 => &EXPL_TOP_6,
            Hoa1 => &HOA1,
            Hoa2 => &HOA2,
            Hoa3 => &HOA3,
            Hoa4 => &HOA4,
            Hoa5 => &HOA5,
            Hoa6 => &HOA6,
            Hoa7 => &HOA7,
            Binaural => &BINAURAL,
        }
    }

    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channel_order().len()
    }

    pub fn kind(&self) -> LayoutKind {
        use SpeakerLayout::*;
        match self {
            Mono | Stereo | Surround3_1_2 | Surround5_1 | Surround5_1_2 | Surround5_1_4
            | Surround7_1 | Surround7_1_2 | Surround7_1_4 | Surround9_1_6 | Surround22_2 => {
                LayoutKind::Bed
            }
            ExplLfe | ExplStereoS | ExplStereoSs | ExplStereoRs | ExplStereoTf | ExplStereoTb
            | ExplTop4 | ExplFront3 | ExplStereoF | ExplStereoSi | ExplStereoTpSi | ExplTop6 => {
                LayoutKind::Expanded
            }
            Hoa1 | Hoa2 | Hoa3 | Hoa4 | Hoa5 | Hoa6 | Hoa7 => LayoutKind::Scene,
            Binaural => LayoutKind::Binaural,
        }
    }

    #[inline]
    pub fn is_bed(&self) -> bool {
        self.kind() == LayoutKind::Bed
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.kind() == LayoutKind::Expanded
    }

    /// Beds and expanded layouts: anything made of discrete loudspeaker channels.
    #[inline]
    pub fn is_channel_based(&self) -> bool {
        matches!(self.kind(), LayoutKind::Bed | LayoutKind::Expanded)
    }

    #[inline]
    pub fn is_ambisonic(&self) -> bool {
        self.kind() == LayoutKind::Scene
    }

    #[inline]
    pub fn is_binaural(&self) -> bool {
        self.kind() == LayoutKind::Binaural
    }

    /// Ambisonic order for scene layouts.
    pub fn ambisonic_order(&self) -> Option<usize> {
        use SpeakerLayout::*;
        match self {
            Hoa1 => Some(1),
            Hoa2 => Some(2),
            Hoa3 => Some(3),
            Hoa4 => Some(4),
            Hoa5 => Some(5),
            Hoa6 => Some(6),
            Hoa7 => Some(7),
            _ => None,
        }
    }

    pub fn from_ambisonic_order(order: usize) -> Option<SpeakerLayout> {
        order
            .checked_sub(1)
            .and_then(|i| Self::SCENES.get(i))
            .copied()
    }

    /// Base bed an expanded layout is carved out of.
    ///
    /// # Panics
    ///
    /// Calling this on a layout that is not expanded is a programming error.
    pub fn base_layout(&self) -> SpeakerLayout {
        use SpeakerLayout::*;
        match self {
            ExplStereoS => Surround5_1_4,
            ExplLfe | ExplStereoSs | ExplStereoRs | ExplStereoTf | ExplStereoTb | ExplTop4
            | ExplFront3 => Surround7_1_4,
            ExplStereoF | ExplStereoSi | ExplStereoTpSi | ExplTop6 => Surround9_1_6,
            other => panic!("base_layout() queried on non-expanded layout {other}"),
        }
    }

    /// The base layout for expanded layouts, the layout itself otherwise.
    pub fn resolved_base(&self) -> SpeakerLayout {
        if self.is_expanded() {
            self.base_layout()
        } else {
            *self
        }
    }

    /// Slot index of `channel` in this layout's ordering.
    pub fn index_of(&self, channel: ChannelType) -> Option<usize> {
        self.channel_order().iter().position(|&c| c == channel)
    }

    /// `(base slot, own channel)` pairs scattering an expanded layout into its base.
    ///
    /// # Panics
    ///
    /// Panics on non-expanded layouts, like [`base_layout`](Self::base_layout).
    pub fn channel_map(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let base = self.base_layout();
        self.channel_order()
            .iter()
            .enumerate()
            .filter_map(move |(src, &ch)| base.index_of(ch).map(|dst| (dst, src)))
    }

    /// Bit `n` is set when base slot `n` is carried by this expanded layout.
    pub fn subset_mask(&self) -> u32 {
        self.channel_map().fold(0, |mask, (dst, _)| mask | (1 << dst))
    }

    /// ITU-R BS.2051 "upper+middle+bottom" system name, if the layout is standardized.
    pub fn itu_system_name(&self) -> Option<&'static str> {
        use SpeakerLayout::*;
        match self {
            Stereo => Some("0+2+0"),
            Surround5_1 => Some("0+5+0"),
            Surround5_1_2 => Some("2+5+0"),
            Surround5_1_4 => Some("4+5+0"),
            Surround7_1 => Some("0+7+0"),
            Surround7_1_4 => Some("4+7+0"),
            Surround22_2 => Some("9+10+3"),
            _ => None,
        }
    }

    pub fn from_itu_system_name(name: &str) -> Option<SpeakerLayout> {
        Self::BEDS
            .into_iter()
            .find(|layout| layout.itu_system_name() == Some(name))
    }

    /// Stable identifier used by `Display`, `FromStr` and serde.
    pub fn name(&self) -> &'static str {
        use SpeakerLayout::*;
        match self {
            Mono => "mono",
            Stereo => "stereo",
            Surround3_1_2 => "3.1.2",
            Surround5_1 => "5.1",
            Surround5_1_2 => "5.1.2",
            Surround5_1_4 => "5.1.4",
            Surround7_1 => "7.1",
            Surround7_1_2 => "7.1.2",
            Surround7_1_4 => "7.1.4",
            Surround9_1_6 => "9.1.6",
            Surround22_2 => "22.2",
            ExplLfe => "7.1.4/lfe",
            ExplStereoS => "5.1.4/surround",
            ExplStereoSs => "7.1.4/side",
            ExplStereoRs => "7.1.4/rear",
            ExplStereoTf => "7.1.4/top-front",
            ExplStereoTb => "7.1.4/top-back",
            ExplTop4 => "7.1.4/top",
            ExplFront3 => "7.1.4/front",
            ExplStereoF => "9.1.6/front",
            ExplStereoSi => "9.1.6/side",
            ExplStereoTpSi => "9.1.6/top-side",
            ExplTop6 => "9.1.6/top",
            Hoa1 => "hoa1",
            Hoa2 => "hoa2",
            Hoa3 => "hoa3",
            Hoa4 => "hoa4",
            Hoa5 => "hoa5",
            Hoa6 => "hoa6",
            Hoa7 => "hoa7",
            Binaural => "binaural",
        }
    }
}

impl fmt::Display for SpeakerLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpeakerLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::all()
            .find(|layout| layout.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownLayout(s.to_string()))
    }
}

impl Serialize for SpeakerLayout {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SpeakerLayout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
