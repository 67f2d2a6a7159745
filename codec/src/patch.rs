//! JPEG-LS interoperability quirks.
use snafu::Snafu;
use std::fmt;
use std::str::FromStr;

/// A known deviation in how some JPEG-LS codecs lay out the LSE marker
/// segment for images with more than 8 bits per sample.
///
/// A codec descriptor may carry one of these values
/// so that the caller patches the code stream accordingly
/// before decoding or after encoding.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PatchJpegLs {
    /// Rewrite a code stream produced by the JAI codec
    /// into one conforming to ISO/IEC 14495-1.
    Jai2Iso,
    /// Rewrite a conforming code stream into the layout the JAI codec expects.
    Iso2Jai,
    /// Like [`Iso2Jai`](PatchJpegLs::Iso2Jai),
    /// but only if the code stream carries an APP or COM marker segment.
    Iso2JaiIfAppOrCom,
}

impl PatchJpegLs {
    /// The canonical name of this quirk, as written in descriptor documents.
    pub fn name(self) -> &'static str {
        match self {
            PatchJpegLs::Jai2Iso => "JAI2ISO",
            PatchJpegLs::Iso2Jai => "ISO2JAI",
            PatchJpegLs::Iso2JaiIfAppOrCom => "ISO2JAI_IF_APP_OR_COM",
        }
    }
}

impl fmt::Display for PatchJpegLs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for an unrecognized JPEG-LS patch mode name.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(display("Unknown JPEG-LS patch mode `{}`", value))]
pub struct ParsePatchJpegLsError {
    value: String,
}

impl ParsePatchJpegLsError {
    /// The offending value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for PatchJpegLs {
    type Err = ParsePatchJpegLsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JAI2ISO" => Ok(PatchJpegLs::Jai2Iso),
            "ISO2JAI" => Ok(PatchJpegLs::Iso2Jai),
            "ISO2JAI_IF_APP_OR_COM" => Ok(PatchJpegLs::Iso2JaiIfAppOrCom),
            _ => ParsePatchJpegLsSnafu { value: s }.fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PatchJpegLs;

    #[test]
    fn parse_canonical_names() {
        assert_eq!("JAI2ISO".parse(), Ok(PatchJpegLs::Jai2Iso));
        assert_eq!("ISO2JAI".parse(), Ok(PatchJpegLs::Iso2Jai));
        assert_eq!(
            "ISO2JAI_IF_APP_OR_COM".parse(),
            Ok(PatchJpegLs::Iso2JaiIfAppOrCom)
        );
        assert_eq!(PatchJpegLs::Iso2JaiIfAppOrCom.to_string(), "ISO2JAI_IF_APP_OR_COM");
    }

    #[test]
    fn names_are_case_sensitive() {
        let err = "jai2iso".parse::<PatchJpegLs>().unwrap_err();
        assert_eq!(err.value(), "jai2iso");
        assert!("".parse::<PatchJpegLs>().is_err());
    }
}
