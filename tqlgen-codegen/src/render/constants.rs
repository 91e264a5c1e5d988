//! Leaf constants template: type and enum constants without lookup tables.

use super::registry::{write_enum_constants, write_type_constants};
use super::{trim_trailing_blank, write_header, write_name_list};
use crate::builders::RegistryView;
use crate::error::CodegenResult;

/// Renders the constant subset of a [`RegistryView`].
#[derive(Debug, Clone)]
pub struct ConstantsTemplate {
    pub header: bool,
}

impl Default for ConstantsTemplate {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstantsTemplate {
    pub fn new() -> Self {
        Self { header: true }
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn render(&self, view: &RegistryView) -> CodegenResult<String> {
        let mut out = String::new();
        write_header(&mut out, self.header, &view.module_name)?;
        write_type_constants(&mut out, view, false)?;
        write_enum_constants(&mut out, view)?;
        if !view.all_attributes.is_empty() {
            write_name_list(
                &mut out,
                "Every attribute type.",
                "ALL_ATTRIBUTES",
                &view.all_attributes,
            )?;
        }
        trim_trailing_blank(&mut out);
        Ok(out)
    }
}
