//! Symbology Translation
//!
//! Maps the code kinds a capability provider can report onto the fixed set of
//! symbologies the host understands. The mapping is a static table; kinds
//! missing from it are not reportable to the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Barcode symbology as reported to the host
///
/// Serialized as its host tag from [`Symbology::tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbology {
    Aztec,
    Code39,
    Code93,
    Code128,
    DataMatrix,
    Ean8,
    Ean13,
    Itf,
    Pdf417,
    QrCode,
    UpcE,
}

/// Host tag for every symbology, in declaration order
static TAGS: [(Symbology, &str); 11] = [
    (Symbology::Aztec, "AZTEC"),
    (Symbology::Code39, "CODE_39"),
    (Symbology::Code93, "CODE_93"),
    (Symbology::Code128, "CODE_128"),
    (Symbology::DataMatrix, "DATA_MATRIX"),
    (Symbology::Ean8, "EAN_8"),
    (Symbology::Ean13, "EAN_13"),
    (Symbology::Itf, "ITF"),
    (Symbology::Pdf417, "PDF_417"),
    (Symbology::QrCode, "QR_CODE"),
    (Symbology::UpcE, "UPC_E"),
];

impl Symbology {
    /// All symbologies the host can receive
    pub const ALL: [Symbology; 11] = [
        Symbology::Aztec,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Code128,
        Symbology::DataMatrix,
        Symbology::Ean8,
        Symbology::Ean13,
        Symbology::Itf,
        Symbology::Pdf417,
        Symbology::QrCode,
        Symbology::UpcE,
    ];

    /// Wire tag sent to the host (e.g. `QR_CODE`)
    pub fn tag(self) -> &'static str {
        TAGS[self as usize].1
    }

    /// Translate a provider-reported kind, `None` when the host cannot receive it
    pub fn from_kind(kind: CodeKind) -> Option<Self> {
        SUPPORTED_KINDS
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, symbology)| *symbology)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for Symbology {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Symbology {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

/// Error returned when parsing an unknown symbology tag
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown symbology tag: {0}")]
pub struct UnknownTag(pub String);

impl FromStr for Symbology {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TAGS.iter()
            .find(|(_, tag)| *tag == s)
            .map(|(symbology, _)| *symbology)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Code kinds a capability provider may detect
///
/// This is a superset of [`Symbology`]: providers commonly recognize formats
/// the host has no tag for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    Aztec,
    Codabar,
    Code39,
    Code39Mod43,
    Code93,
    Code128,
    DataMatrix,
    Ean8,
    Ean13,
    Gs1DataBar,
    Interleaved2of5,
    Itf14,
    MicroPdf417,
    MicroQr,
    Pdf417,
    Qr,
    UpcA,
    UpcE,
    Face,
    #[serde(other)]
    Unknown,
}

/// Provider kinds the host can receive, and the symbology each becomes
static SUPPORTED_KINDS: [(CodeKind, Symbology); 11] = [
    (CodeKind::Aztec, Symbology::Aztec),
    (CodeKind::Code39, Symbology::Code39),
    (CodeKind::Code93, Symbology::Code93),
    (CodeKind::Code128, Symbology::Code128),
    (CodeKind::DataMatrix, Symbology::DataMatrix),
    (CodeKind::Ean8, Symbology::Ean8),
    (CodeKind::Ean13, Symbology::Ean13),
    (CodeKind::Itf14, Symbology::Itf),
    (CodeKind::Pdf417, Symbology::Pdf417),
    (CodeKind::Qr, Symbology::QrCode),
    (CodeKind::UpcE, Symbology::UpcE),
];

/// A decoded code ready for delivery to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub code: String,
    #[serde(rename = "type")]
    pub symbology: Symbology,
}

impl ScanResult {
    /// Build a result from a provider detection
    ///
    /// Returns `None` for an empty or missing payload, or for a kind outside
    /// the supported table.
    pub fn from_detection(kind: CodeKind, payload: Option<&str>) -> Option<Self> {
        let symbology = Symbology::from_kind(kind)?;
        let code = payload.filter(|value| !value.is_empty())?;
        Some(Self {
            code: code.to_string(),
            symbology,
        })
    }
}
