//! Object position shared between the control thread and the audio thread.
//!
//! The control side writes a whole [`PannerPosition`] under a short lock and raises
//! a dirty flag. The audio side only ever `try_lock`s: if the writer holds the lock
//! the update is picked up on the next block, so a render never waits on the UI and
//! never observes a half-written position.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::lockfree::AtomicFlag;
use crate::{Error, Result};

/// Spherical source position.
///
/// Azimuth in degrees, positive to the left (−180..=180). Elevation in degrees,
/// positive upward (−90..=90). Distance in metres, strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PannerPosition {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
}

impl PannerPosition {
    pub fn new(azimuth: f32, elevation: f32, distance: f32) -> Result<Self> {
        if !azimuth.is_finite() || !(-180.0..=180.0).contains(&azimuth) {
            return Err(Error::InvalidAzimuth(azimuth));
        }
        if !elevation.is_finite() || !(-90.0..=90.0).contains(&elevation) {
            return Err(Error::InvalidElevation(elevation));
        }
        if !distance.is_finite() || distance <= 0.0 {
            return Err(Error::InvalidDistance(distance));
        }
        Ok(Self {
            azimuth,
            elevation,
            distance,
        })
    }

    /// Unit direction vector `(x, y, z)`: x forward, y left, z up.
    pub fn unit_vector(&self) -> [f32; 3] {
        direction_vector(self.azimuth, self.elevation)
    }
}

impl Default for PannerPosition {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            distance: 1.0,
        }
    }
}

/// Unit vector for an (azimuth, elevation) pair in degrees.
pub fn direction_vector(azimuth: f32, elevation: f32) -> [f32; 3] {
    let (az, el) = (azimuth.to_radians(), elevation.to_radians());
    [el.cos() * az.cos(), el.cos() * az.sin(), el.sin()]
}

#[derive(Debug, Default)]
pub struct PositionCell {
    position: Mutex<PannerPosition>,
    dirty: AtomicFlag,
}

impl PositionCell {
    pub fn new(position: PannerPosition) -> Self {
        Self {
            position: Mutex::new(position),
            // Force the first block to pick the initial position up.
            dirty: AtomicFlag::new(true),
        }
    }

    /// Publishes a new position. Called from the control thread.
    pub fn store(&self, position: PannerPosition) {
        let mut guard = self.position.lock();
        *guard = position;
        self.dirty.set(true);
    }

    /// Latest position, blocking. Not for the audio thread.
    pub fn load(&self) -> PannerPosition {
        *self.position.lock()
    }

    /// Returns the new position if one was published since the last poll.
    ///
    /// Never blocks. When the writer currently holds the lock, returns `None` and
    /// leaves the dirty flag set so the next poll retries.
    pub fn poll(&self) -> Option<PannerPosition> {
        if !self.dirty.take() {
            return None;
        }
        match self.position.try_lock() {
            Some(guard) => Some(*guard),
            None => {
                self.dirty.set(true);
                None
            }
        }
    }
}

/// Cloneable control-side handle to a panner's position.
#[derive(Debug, Clone)]
pub struct PositionHandle {
    cell: Arc<PositionCell>,
}

impl PositionHandle {
    pub fn new(cell: Arc<PositionCell>) -> Self {
        Self { cell }
    }

    /// Validates and publishes a position.
    pub fn set_position(&self, azimuth: f32, elevation: f32, distance: f32) -> Result<()> {
        let position = PannerPosition::new(azimuth, elevation, distance)?;
        self.cell.store(position);
        Ok(())
    }

    pub fn position(&self) -> PannerPosition {
        self.cell.load()
    }
}
