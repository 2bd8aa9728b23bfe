//! Project file version detection.
//!
//! The first line of every project file is a short ASCII header such as `CPYA 4.2673 552#`.
//! The build version embedded in it selects one of the historical binary layouts
//! ([`FormatRevision`]); every decoder branches on that revision.

use std::fmt;

use crate::diagnostics::DiagnosticsLog;
use crate::errors::HeaderError;

const MAGIC: &[u8] = b"CPYA";
/// The header line must end within this many bytes.
const MAX_HEADER_LINE: usize = 64;
const MAJOR_OFFSET: usize = 5;
const DECIMAL_POINT_OFFSET: usize = 6;
const BUILD_VERSION_OFFSET: usize = 7;
const BUILD_NUMBER_OFFSET: usize = 12;
/// Major version 3 files use this build threshold instead of the table.
const MAJOR3_BUILD_THRESHOLD: u32 = 830;

/// One of the historical binary layouts, ordered oldest to newest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormatRevision {
    V350,
    V410,
    V500,
    V600,
    V601,
    V604,
    V610,
    V700,
    V701,
    V702,
    V703,
    V704,
    V750,
    V800,
    V801,
    V810,
    V850,
    V851,
    V860,
    V900,
    V910,
    V920,
    V930,
    V931,
    V940,
    V941,
}

impl FormatRevision {
    pub const ALL: [FormatRevision; 26] = [
        FormatRevision::V350,
        FormatRevision::V410,
        FormatRevision::V500,
        FormatRevision::V600,
        FormatRevision::V601,
        FormatRevision::V604,
        FormatRevision::V610,
        FormatRevision::V700,
        FormatRevision::V701,
        FormatRevision::V702,
        FormatRevision::V703,
        FormatRevision::V704,
        FormatRevision::V750,
        FormatRevision::V800,
        FormatRevision::V801,
        FormatRevision::V810,
        FormatRevision::V850,
        FormatRevision::V851,
        FormatRevision::V860,
        FormatRevision::V900,
        FormatRevision::V910,
        FormatRevision::V920,
        FormatRevision::V930,
        FormatRevision::V931,
        FormatRevision::V940,
        FormatRevision::V941,
    ];

    /// Numeric tag, e.g. `704` for 7.0 SR4.
    pub const fn tag(self) -> u32 {
        match self {
            FormatRevision::V350 => 350,
            FormatRevision::V410 => 410,
            FormatRevision::V500 => 500,
            FormatRevision::V600 => 600,
            FormatRevision::V601 => 601,
            FormatRevision::V604 => 604,
            FormatRevision::V610 => 610,
            FormatRevision::V700 => 700,
            FormatRevision::V701 => 701,
            FormatRevision::V702 => 702,
            FormatRevision::V703 => 703,
            FormatRevision::V704 => 704,
            FormatRevision::V750 => 750,
            FormatRevision::V800 => 800,
            FormatRevision::V801 => 801,
            FormatRevision::V810 => 810,
            FormatRevision::V850 => 850,
            FormatRevision::V851 => 851,
            FormatRevision::V860 => 860,
            FormatRevision::V900 => 900,
            FormatRevision::V910 => 910,
            FormatRevision::V920 => 920,
            FormatRevision::V930 => 930,
            FormatRevision::V931 => 931,
            FormatRevision::V940 => 940,
            FormatRevision::V941 => 941,
        }
    }

    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.tag() == tag)
    }

    /// Human-readable version number (`7.04`).
    pub fn as_f64(self) -> f64 {
        f64::from(self.tag()) / 100.0
    }

    /// Year-based release tag used from the 2015 release on (`20161` for 2016.1).
    pub const fn sub_revision(self) -> Option<u32> {
        match self {
            FormatRevision::V920 => Some(20150),
            FormatRevision::V930 => Some(20160),
            FormatRevision::V931 => Some(20161),
            FormatRevision::V940 => Some(20170),
            FormatRevision::V941 => Some(20171),
            _ => None,
        }
    }

    /// Resolve a header's major/build version pair.
    pub fn from_build(major: u32, build: u32) -> Self {
        if major == 3 {
            return if build < MAJOR3_BUILD_THRESHOLD {
                FormatRevision::V350
            } else {
                FormatRevision::V410
            };
        }

        REVISION_TABLE
            .iter()
            .find(|(upper, _)| build < *upper)
            .map(|(_, revision)| *revision)
            .unwrap_or(NEWEST_REVISION)
    }
}

impl fmt::Display for FormatRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.as_f64())
    }
}

/// Build versions of released writers: `(exclusive upper bound, revision)`, scanned in order,
/// first hit wins. Builds at or past the last bound resolve to [`NEWEST_REVISION`].
///
/// These bounds are tied to real shipped builds; keep them exactly as they are.
pub const REVISION_TABLE: [(u32, FormatRevision); 25] = [
    (110, FormatRevision::V500),  // 5.0 (pre-4.1 build numbering)
    (142, FormatRevision::V410),  // 4.1 (110-141)
    (211, FormatRevision::V500),  // 5.0
    (2624, FormatRevision::V600), // 6.0
    (2628, FormatRevision::V601), // 6.0 SR1
    (2635, FormatRevision::V604), // 6.0 SR4
    (2656, FormatRevision::V610), // 6.1
    (2659, FormatRevision::V700), // 7.0 SR0 (2656-2658)
    (2664, FormatRevision::V701), // 7.0 SR1 (2659-2663)
    (2672, FormatRevision::V702), // 7.0 SR2 (2664-2671)
    (2673, FormatRevision::V703), // 7.0 SR3 (2672)
    (2766, FormatRevision::V704), // 7.0 SR4 (2673-2765)
    (2878, FormatRevision::V750), // 7.5 (2766-2877)
    (2881, FormatRevision::V800), // 8.0 SR0 (2878-2880)
    (2892, FormatRevision::V801), // 8.0 SR1-SR3 (2881-2891)
    (2944, FormatRevision::V810), // 8.0 SR4, 8.1 SR1-SR4 (2892-2943)
    (2947, FormatRevision::V850), // 8.5 SR0, SR1 (2944-2946)
    (2962, FormatRevision::V851), // 8.5.1 SR0-SR2
    (2980, FormatRevision::V860), // 8.6 SR0-SR3
    (3025, FormatRevision::V900), // 9.0 SR0-SR2
    (3078, FormatRevision::V910), // 9.1 SR0-SR3
    (3117, FormatRevision::V920), // 2015 (9.2) SR0-SR2
    (3169, FormatRevision::V930), // 2016 (9.3.0) SR0
    (3172, FormatRevision::V931), // 2016.1, 2016.2 (9.3.1, 9.3.2)
    (3225, FormatRevision::V940), // 2017.0 (9.4.0) SR0
];

/// 2017.1 (9.4.1) SR1 or newer.
pub const NEWEST_REVISION: FormatRevision = FormatRevision::V941;

/// Version information decoded from the header line. Computed once per file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatVersion {
    pub major: u32,
    /// Locale decimal point character recorded by the writer. Not used for decoding.
    pub decimal_point: char,
    pub build: u32,
    /// Informational build counter; absent in short headers.
    pub build_number: Option<u32>,
    pub revision: FormatRevision,
    pub sub_revision: Option<u32>,
}

impl FormatVersion {
    /// Version for a known revision, as if read from a typical header of that release.
    pub fn for_revision(revision: FormatRevision) -> Self {
        Self {
            major: if revision <= FormatRevision::V410 { 3 } else { 4 },
            decimal_point: '.',
            build: 0,
            build_number: None,
            revision,
            sub_revision: revision.sub_revision(),
        }
    }

    pub fn as_f64(&self) -> f64 {
        self.revision.as_f64()
    }

    pub fn is_at_least(&self, revision: FormatRevision) -> bool {
        self.revision >= revision
    }

    /// Human-readable description used in the diagnostics log.
    pub fn describe(&self) -> String {
        match self.sub_revision {
            _ if self.revision == NEWEST_REVISION => {
                "Found project version 2017.1 (9.4.1) or newer".to_string()
            }
            Some(sub) => format!(
                "Found project version {:.1} ({:.2})",
                f64::from(sub) / 10.0,
                self.as_f64()
            ),
            None => format!("Found project version {:.2}", self.as_f64()),
        }
    }
}

/// Split the header line off the start of `bytes`.
///
/// Returns the line (without the terminator) and the offset of the first byte after it.
pub fn read_version_line(bytes: &[u8]) -> Result<(&[u8], usize), HeaderError> {
    let window = bytes.get(..MAX_HEADER_LINE.min(bytes.len())).unwrap_or(bytes);
    let end = window
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(HeaderError::MissingTerminator {
            searched: window.len(),
        })?;
    Ok((&bytes[..end], end + 1))
}

/// Parse the header line (without its `\n`) into a [`FormatVersion`].
pub fn detect_format_version(line: &[u8]) -> Result<FormatVersion, HeaderError> {
    if line.len() <= BUILD_VERSION_OFFSET {
        return Err(HeaderError::TooShort { len: line.len() });
    }
    if !line.starts_with(MAGIC) {
        return Err(HeaderError::BadMagic {
            found: String::from_utf8_lossy(&line[..MAGIC.len()]).into_owned(),
        });
    }

    let major_byte = line[MAJOR_OFFSET];
    if !major_byte.is_ascii_digit() {
        return Err(HeaderError::NonNumeric {
            field: "major version",
        });
    }
    let major = u32::from(major_byte - b'0');
    let decimal_point = char::from(line[DECIMAL_POINT_OFFSET]);

    let build = leading_decimal(&line[BUILD_VERSION_OFFSET..]).ok_or(HeaderError::NonNumeric {
        field: "build version",
    })?;
    let build_number = line
        .get(BUILD_NUMBER_OFFSET..)
        .and_then(leading_decimal);

    let revision = FormatRevision::from_build(major, build);
    Ok(FormatVersion {
        major,
        decimal_point,
        build,
        build_number,
        revision,
        sub_revision: revision.sub_revision(),
    })
}

/// Read the header line from a whole file buffer, detect the version, and log it.
///
/// Returns the version and the offset at which the binary body starts.
pub(crate) fn detect_from_file(
    bytes: &[u8],
    log: &mut DiagnosticsLog,
) -> Result<(FormatVersion, usize), HeaderError> {
    let (line, body_start) = read_version_line(bytes)?;
    let version = detect_format_version(line)?;

    log::debug!(
        "header {:?}: major={} build={} decimal_point={:?} -> {}",
        String::from_utf8_lossy(line),
        version.major,
        version.build,
        version.decimal_point,
        version.revision
    );
    log.info(None, version.describe());
    if !line.ends_with(b"#") {
        log.warn(Some(0), "header line does not end with `#`");
    }
    Ok((version, body_start))
}

/// Parse the decimal digits at the start of `bytes`, like `strtol` without a sign.
fn leading_decimal(bytes: &[u8]) -> Option<u32> {
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let mut value: u32 = 0;
    for &b in &bytes[..digits] {
        value = value.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }
    Some(value)
}
