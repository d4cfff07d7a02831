//! Channel-type tags used in ITU channel orderings.
//!
//! Loudspeaker channels carry a nominal direction in ITU-R BS.2051 convention:
//! azimuth in degrees with positive values to the left, elevation in degrees with
//! positive values upward. Ambisonic channels are tagged by their ACN index.

/// A single slot in a layout's channel ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelType {
    /// Single mono channel (no nominal speaker position).
    Mono,
    /// M+030
    FrontLeft,
    /// M-030
    FrontRight,
    /// M+000
    FrontCentre,
    /// Low-frequency effects.
    Lfe1,
    /// Second LFE of 22.2.
    Lfe2,
    /// M+110 (5.1 surround)
    SurroundLeft,
    /// M-110
    SurroundRight,
    /// M+090
    SideLeft,
    /// M-090
    SideRight,
    /// M+135
    BackLeft,
    /// M-135
    BackRight,
    /// M+180
    BackCentre,
    /// M+060
    WideLeft,
    /// M-060
    WideRight,
    /// U+045
    TopFrontLeft,
    /// U-045
    TopFrontRight,
    /// U+000
    TopFrontCentre,
    /// T+000
    TopCentre,
    /// U+090
    TopSideLeft,
    /// U-090
    TopSideRight,
    /// U+135
    TopBackLeft,
    /// U-135
    TopBackRight,
    /// U+180
    TopBackCentre,
    /// B+000
    BottomFrontCentre,
    /// B+045
    BottomFrontLeft,
    /// B-045
    BottomFrontRight,
    /// Left ear feed.
    BinauralLeft,
    /// Right ear feed.
    BinauralRight,
    /// Ambisonic channel with the given ACN index.
    Ambisonic(u8),
}

impl ChannelType {
    /// Nominal (azimuth, elevation) in degrees.
    ///
    /// `None` for channels without a loudspeaker position (LFE, binaural, ambisonic).
    pub fn direction(&self) -> Option<(f32, f32)> {
        use ChannelType::*;
        let dir = match self {
            Mono | FrontCentre => (0.0, 0.0),
            FrontLeft => (30.0, 0.0),
            FrontRight => (-30.0, 0.0),
            SurroundLeft => (110.0, 0.0),
            SurroundRight => (-110.0, 0.0),
            SideLeft => (90.0, 0.0),
            SideRight => (-90.0, 0.0),
            BackLeft => (135.0, 0.0),
            BackRight => (-135.0, 0.0),
            BackCentre => (180.0, 0.0),
            WideLeft => (60.0, 0.0),
            WideRight => (-60.0, 0.0),
            TopFrontLeft => (45.0, 30.0),
            TopFrontRight => (-45.0, 30.0),
            TopFrontCentre => (0.0, 30.0),
            TopCentre => (0.0, 90.0),
            TopSideLeft => (90.0, 30.0),
            TopSideRight => (-90.0, 30.0),
            TopBackLeft => (135.0, 30.0),
            TopBackRight => (-135.0, 30.0),
            TopBackCentre => (180.0, 30.0),
            BottomFrontCentre => (0.0, -30.0),
            BottomFrontLeft => (45.0, -30.0),
            BottomFrontRight => (-45.0, -30.0),
            Lfe1 | Lfe2 | BinauralLeft | BinauralRight | Ambisonic(_) => return None,
        };
        Some(dir)
    }

    #[inline]
    pub fn is_lfe(&self) -> bool {
        matches!(self, ChannelType::Lfe1 | ChannelType::Lfe2)
    }

    /// Short label used in logs and debug output.
    pub fn label(&self) -> &'static str {
        use ChannelType::*;
        match self {
            Mono => "M",
            FrontLeft => "L",
            FrontRight => "R",
            FrontCentre => "C",
            Lfe1 => "LFE",
            Lfe2 => "LFE2",
            SurroundLeft => "Ls",
            SurroundRight => "Rs",
            SideLeft => "Lss",
            SideRight => "Rss",
            BackLeft => "Lrs",
            BackRight => "Rrs",
            BackCentre => "Cs",
            WideLeft => "Lw",
            WideRight => "Rw",
            TopFrontLeft => "Ltf",
            TopFrontRight => "Rtf",
            TopFrontCentre => "Ctf",
            TopCentre => "Tc",
            TopSideLeft => "Lts",
            TopSideRight => "Rts",
            TopBackLeft => "Ltb",
            TopBackRight => "Rtb",
            TopBackCentre => "Ctb",
            BottomFrontCentre => "Cbf",
            BottomFrontLeft => "Lbf",
            BottomFrontRight => "Rbf",
            BinauralLeft => "BL",
            BinauralRight => "BR",
            Ambisonic(_) => "ACN",
        }
    }
}

/// Builds an ACN-ordered run of ambisonic channel tags.
pub(crate) const fn acn_sequence<const N: usize>() -> [ChannelType; N] {
    let mut out = [ChannelType::Ambisonic(0); N];
    let mut i = 0;
    while i < N {
        out[i] = ChannelType::Ambisonic(i as u8);
        i += 1;
    }
    out
}
