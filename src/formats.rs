#[cfg(any(feature = "xml", feature = "atom"))]
pub(crate) mod markup;

#[cfg(feature = "atom")]
pub mod atom;
pub mod json;
#[cfg(feature = "xml")]
pub mod xml;

use crate::converter::OutputConverter;
use crate::negotiate::Format;

pub fn get_converter(format: Format) -> crate::error::Result<Box<dyn OutputConverter>> {
    match format {
        Format::Json => Ok(Box::new(json::JsonConverter)),

        #[cfg(feature = "xml")]
        Format::Xml => Ok(Box::new(xml::XmlConverter)),
        #[cfg(not(feature = "xml"))]
        Format::Xml => Err(crate::error::Error::FeatureDisabled("xml".into())),

        #[cfg(feature = "atom")]
        Format::Atom => Ok(Box::new(atom::AtomConverter)),
        #[cfg(not(feature = "atom"))]
        Format::Atom => Err(crate::error::Error::FeatureDisabled("atom".into())),
    }
}
