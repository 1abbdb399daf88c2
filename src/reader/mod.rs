pub mod prerendered;
pub mod table;

use crate::error::Result;
use crate::model::SiteMask;

/// The serializer side of an external simulation: knows its candidate sites and
/// samples, and renders VCF text for the sites a mask retains.
pub trait SiteSource {
    fn samples(&self) -> &[String];
    fn n_sites(&self) -> usize;
    fn render(&mut self, mask: &SiteMask) -> Result<String>;
}
