//! Spectral sensor readings.
//!
//! A [`Reading`] is one append-only row in the reading store: a station's
//! instantaneous multi-channel measurement stamped by the store at write time.
//! A [`NewReading`] is the canonical insertion record handed to the store
//! before it has an id or a timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::station::StationId;

crate::define_id_type!(i64, ReadingId);

/// Named spectral channels reported by a sensor node.
///
/// Eleven narrow bands identified by their centre wavelength plus the
/// broadband `clear` photodiode.
///
/// Serialized as its [`field_name`](SpectralBand::field_name), which is the
/// only place the wire names are spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum SpectralBand {
    Violet415,
    Indigo440,
    Blue485,
    Cyan515,
    Green555,
    Yellow590,
    Orange610,
    Red680,
    FarRed730,
    FarRed760,
    NearInfrared860,
    Clear,
}

impl SpectralBand {
    pub const ALL: [SpectralBand; 12] = [
        SpectralBand::Violet415,
        SpectralBand::Indigo440,
        SpectralBand::Blue485,
        SpectralBand::Cyan515,
        SpectralBand::Green555,
        SpectralBand::Yellow590,
        SpectralBand::Orange610,
        SpectralBand::Red680,
        SpectralBand::FarRed730,
        SpectralBand::FarRed760,
        SpectralBand::NearInfrared860,
        SpectralBand::Clear,
    ];

    /// Band used as the numerator of the R:FR ratio.
    pub const RED: SpectralBand = SpectralBand::Red680;
    /// Band used as the denominator of the R:FR ratio.
    pub const FAR_RED: SpectralBand = SpectralBand::FarRed730;

    /// Field name used in payloads and in the `sensor_readings` table.
    pub fn field_name(self) -> &'static str {
        match self {
            SpectralBand::Violet415 => "ch_415",
            SpectralBand::Indigo440 => "ch_440",
            SpectralBand::Blue485 => "ch_485",
            SpectralBand::Cyan515 => "ch_515",
            SpectralBand::Green555 => "ch_555",
            SpectralBand::Yellow590 => "ch_590",
            SpectralBand::Orange610 => "ch_610",
            SpectralBand::Red680 => "ch_680",
            SpectralBand::FarRed730 => "ch_730",
            SpectralBand::FarRed760 => "ch_760",
            SpectralBand::NearInfrared860 => "ch_860",
            SpectralBand::Clear => "ch_clear",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.field_name() == name)
    }

    /// Centre wavelength in nanometres; `None` for the broadband channel.
    pub fn wavelength_nm(self) -> Option<u16> {
        match self {
            SpectralBand::Violet415 => Some(415),
            SpectralBand::Indigo440 => Some(440),
            SpectralBand::Blue485 => Some(485),
            SpectralBand::Cyan515 => Some(515),
            SpectralBand::Green555 => Some(555),
            SpectralBand::Yellow590 => Some(590),
            SpectralBand::Orange610 => Some(610),
            SpectralBand::Red680 => Some(680),
            SpectralBand::FarRed730 => Some(730),
            SpectralBand::FarRed760 => Some(760),
            SpectralBand::NearInfrared860 => Some(860),
            SpectralBand::Clear => None,
        }
    }
}

impl From<SpectralBand> for &'static str {
    fn from(band: SpectralBand) -> Self {
        band.field_name()
    }
}

impl TryFrom<String> for SpectralBand {
    type Error = String;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::from_field_name(&name).ok_or_else(|| format!("Unknown spectral band: {}", name))
    }
}

/// Per-band intensities of one measurement.
///
/// `None` means the sensor did not report the band; it is never coerced to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectralChannels {
    #[serde(default)]
    pub ch_415: Option<f64>,
    #[serde(default)]
    pub ch_440: Option<f64>,
    #[serde(default)]
    pub ch_485: Option<f64>,
    #[serde(default)]
    pub ch_515: Option<f64>,
    #[serde(default)]
    pub ch_555: Option<f64>,
    #[serde(default)]
    pub ch_590: Option<f64>,
    #[serde(default)]
    pub ch_610: Option<f64>,
    #[serde(default)]
    pub ch_680: Option<f64>,
    #[serde(default)]
    pub ch_730: Option<f64>,
    #[serde(default)]
    pub ch_760: Option<f64>,
    #[serde(default)]
    pub ch_860: Option<f64>,
    #[serde(default)]
    pub ch_clear: Option<f64>,
}

impl SpectralChannels {
    pub fn get(&self, band: SpectralBand) -> Option<f64> {
        match band {
            SpectralBand::Violet415 => self.ch_415,
            SpectralBand::Indigo440 => self.ch_440,
            SpectralBand::Blue485 => self.ch_485,
            SpectralBand::Cyan515 => self.ch_515,
            SpectralBand::Green555 => self.ch_555,
            SpectralBand::Yellow590 => self.ch_590,
            SpectralBand::Orange610 => self.ch_610,
            SpectralBand::Red680 => self.ch_680,
            SpectralBand::FarRed730 => self.ch_730,
            SpectralBand::FarRed760 => self.ch_760,
            SpectralBand::NearInfrared860 => self.ch_860,
            SpectralBand::Clear => self.ch_clear,
        }
    }

    pub fn set(&mut self, band: SpectralBand, value: Option<f64>) {
        let slot = match band {
            SpectralBand::Violet415 => &mut self.ch_415,
            SpectralBand::Indigo440 => &mut self.ch_440,
            SpectralBand::Blue485 => &mut self.ch_485,
            SpectralBand::Cyan515 => &mut self.ch_515,
            SpectralBand::Green555 => &mut self.ch_555,
            SpectralBand::Yellow590 => &mut self.ch_590,
            SpectralBand::Orange610 => &mut self.ch_610,
            SpectralBand::Red680 => &mut self.ch_680,
            SpectralBand::FarRed730 => &mut self.ch_730,
            SpectralBand::FarRed760 => &mut self.ch_760,
            SpectralBand::NearInfrared860 => &mut self.ch_860,
            SpectralBand::Clear => &mut self.ch_clear,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpectralBand, Option<f64>)> + '_ {
        SpectralBand::ALL.into_iter().map(move |band| (band, self.get(band)))
    }

    /// Number of bands that carry a value.
    pub fn reported_count(&self) -> usize {
        self.iter().filter(|(_, v)| v.is_some()).count()
    }

    /// Simple illuminance proxy: `ch_515 + ch_610 + ch_680`.
    ///
    /// `None` unless all three bands were reported.
    pub fn additive_total(&self) -> Option<f64> {
        Some(self.ch_515? + self.ch_610? + self.ch_680?)
    }
}

/// A stored reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: ReadingId,
    /// Assigned by the store when the row is written.
    pub created_at: DateTime<Utc>,
    #[serde(rename = "sensor_id")]
    pub station_id: StationId,
    #[serde(flatten)]
    pub channels: SpectralChannels,
    #[serde(default)]
    pub total_lux: Option<f64>,
    /// Photosynthetic photon flux density in µmol·m⁻²·s⁻¹.
    #[serde(default)]
    pub ppfd_total: Option<f64>,
}

impl Reading {
    /// Instantaneous flux used as the DLI integrand; missing or non-finite is 0.
    pub fn flux(&self) -> f64 {
        finite_or_zero(self.ppfd_total)
    }

    pub fn red(&self) -> f64 {
        finite_or_zero(self.channels.get(SpectralBand::RED))
    }

    pub fn far_red(&self) -> f64 {
        finite_or_zero(self.channels.get(SpectralBand::FAR_RED))
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Canonical insertion record.
///
/// Carries no timestamp: the store assigns `created_at`. A missing station id
/// is passed through so the store can reject it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewReading {
    #[serde(rename = "sensor_id", default)]
    pub station_id: Option<StationId>,
    #[serde(flatten)]
    pub channels: SpectralChannels,
    #[serde(default)]
    pub total_lux: Option<f64>,
    #[serde(default)]
    pub ppfd_total: Option<f64>,
}

impl NewReading {
    pub fn new(station_id: impl Into<StationId>) -> Self {
        Self {
            station_id: Some(station_id.into()),
            ..Default::default()
        }
    }

    pub fn with_band(mut self, band: SpectralBand, value: f64) -> Self {
        self.channels.set(band, Some(value));
        self
    }

    pub fn with_ppfd(mut self, ppfd_total: f64) -> Self {
        self.ppfd_total = Some(ppfd_total);
        self
    }

    pub fn with_total_lux(mut self, total_lux: f64) -> Self {
        self.total_lux = Some(total_lux);
        self
    }

    /// Materialize the stored row once the store has assigned identity and time.
    pub fn into_reading(
        self,
        id: ReadingId,
        station_id: StationId,
        created_at: DateTime<Utc>,
    ) -> Reading {
        Reading {
            id,
            created_at,
            station_id,
            channels: self.channels,
            total_lux: self.total_lux,
            ppfd_total: self.ppfd_total,
        }
    }
}
