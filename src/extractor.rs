use std::path::Path;

use dotscope::{
    metadata::{
        customattributes::{parse_custom_attribute_blob, CustomAttributeArgument},
        streams::Blob,
        tables::{CodedIndex, CustomAttributeRaw, TableId},
    },
    CilObject, ValidationConfig,
};
use serde::Serialize;

const GUID_ATTRIBUTE: &str = "System.Runtime.InteropServices.GuidAttribute";
const TYPELIB_VERSION_ATTRIBUTE: &str = "System.Runtime.InteropServices.TypeLibVersionAttribute";

/// Identifying metadata read from one managed binary.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataRecord {
    /// Path of the examined file, as discovered during traversal.
    pub file: String,
    /// Assembly name; empty for module-only files without an Assembly row.
    pub assembly_name: String,
    /// Module version identifier in canonical GUID form.
    pub mvid: String,
    /// TYPELIB GUID from the assembly-level `GuidAttribute`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// TYPELIB version from the assembly-level `TypeLibVersionAttribute`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typelib_version: Option<TypeLibVersion>,
}

/// A COM type-library version pair.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TypeLibVersion {
    pub major: u32,
    pub minor: u32,
}

impl std::fmt::Display for TypeLibVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Result of examining one candidate file.
#[derive(Debug)]
pub enum Outcome {
    /// The file is a managed module and its identifying fields were read.
    Extracted(MetadataRecord),
    /// The file was skipped; the run continues with the next candidate.
    Skipped(SkipReason),
}

/// Why a candidate produced no record.
#[derive(Debug)]
pub enum SkipReason {
    /// Not a managed module: malformed, truncated, native-only, or no
    /// longer readable at the supplied path.
    NotAModule(String),
    /// The metadata reader failed in a way that is not a recognized
    /// not-a-module condition.
    Fault(String),
}

/// Narrow seam over the metadata reader so traversal and report formatting
/// can be exercised against a stub.
pub trait MetadataReader {
    fn try_extract(&self, path: &Path) -> Outcome;
}

/// Production reader backed by `dotscope`.
pub struct DotscopeReader;

impl MetadataReader for DotscopeReader {
    fn try_extract(&self, path: &Path) -> Outcome {
        let assembly =
            match CilObject::from_path_with_validation(path, ValidationConfig::analysis()) {
                Ok(assembly) => assembly,
                Err(err) => return Outcome::Skipped(classify_load_error(&err)),
            };

        // No Module table entry means there is no MVID to report.
        let Some(module) = assembly.module() else {
            return Outcome::Skipped(SkipReason::NotAModule(
                "no module table entry".to_string(),
            ));
        };

        let assembly_name = assembly
            .assembly()
            .map(|asm| asm.name.clone())
            .unwrap_or_default();

        let (guid, typelib_version) = assembly_attributes(&assembly);

        Outcome::Extracted(MetadataRecord {
            file: path.display().to_string(),
            assembly_name,
            mvid: module.mvid.to_string(),
            guid,
            typelib_version,
        })
    }
}

fn classify_load_error(err: &dotscope::Error) -> SkipReason {
    match err {
        dotscope::Error::NotSupported
        | dotscope::Error::Parse(_)
        | dotscope::Error::Goblin(_)
        | dotscope::Error::Io(_) => SkipReason::NotAModule(err.to_string()),
        _ => SkipReason::Fault(err.to_string()),
    }
}

/// Pull the TYPELIB GUID and version off the assembly's custom attributes.
///
/// Walks the raw `CustomAttribute` table for rows owned by the Assembly row
/// and decodes the fixed arguments of the two interop attributes. Anything
/// that fails to resolve or decode simply leaves the field absent.
fn assembly_attributes(assembly: &CilObject) -> (Option<String>, Option<TypeLibVersion>) {
    let Some(tables) = assembly.tables() else {
        return (None, None);
    };
    let Some(ca_table) = tables.table::<CustomAttributeRaw>() else {
        return (None, None);
    };
    let Some(blob) = assembly.blob() else {
        return (None, None);
    };

    let mut guid = None;
    let mut typelib = None;

    for row in ca_table {
        if row.parent.tag != TableId::Assembly {
            continue;
        }

        let Some(attr_type) = constructor_type_fullname(assembly, &row.constructor) else {
            continue;
        };

        match attr_type.as_str() {
            GUID_ATTRIBUTE => {
                if let Some(args) = fixed_args(assembly, &row, blob) {
                    if let Some(CustomAttributeArgument::String(value)) = args.first() {
                        guid = Some(value.clone());
                    }
                }
            }
            TYPELIB_VERSION_ATTRIBUTE => {
                if let Some(args) = fixed_args(assembly, &row, blob) {
                    let major = args.first().and_then(int_arg);
                    let minor = args.get(1).and_then(int_arg);
                    if let (Some(major), Some(minor)) = (major, minor) {
                        typelib = Some(TypeLibVersion { major, minor });
                    }
                }
            }
            _ => {}
        }

        if guid.is_some() && typelib.is_some() {
            break;
        }
    }

    (guid, typelib)
}

/// Resolve the attribute constructor to its declaring type's full name.
fn constructor_type_fullname(assembly: &CilObject, ctor: &CodedIndex) -> Option<String> {
    match ctor.tag {
        TableId::MemberRef => assembly
            .member_ref(&ctor.token)
            .and_then(|mr| mr.declaredby.fullname()),
        TableId::MethodDef => assembly
            .method(&ctor.token)
            .ok()
            .and_then(|method| method.declaring_type_fullname()),
        _ => None,
    }
}

/// Decode the fixed constructor arguments of a custom attribute blob.
fn fixed_args(
    assembly: &CilObject,
    row: &CustomAttributeRaw,
    blob: &Blob<'_>,
) -> Option<Vec<CustomAttributeArgument>> {
    if row.value == 0 {
        return None;
    }

    let parsed = match row.constructor.tag {
        TableId::MemberRef => assembly
            .refs_members()
            .get(&row.constructor.token)
            .and_then(|entry| {
                parse_custom_attribute_blob(blob, row.value, &entry.value().params).ok()
            }),
        TableId::MethodDef => assembly
            .methods()
            .get(&row.constructor.token)
            .and_then(|entry| {
                parse_custom_attribute_blob(blob, row.value, &entry.value().params).ok()
            }),
        _ => None,
    };

    parsed.map(|value| value.fixed_args)
}

fn int_arg(arg: &CustomAttributeArgument) -> Option<u32> {
    match arg {
        CustomAttributeArgument::I4(value) => u32::try_from(*value).ok(),
        CustomAttributeArgument::U4(value) => Some(*value),
        _ => None,
    }
}
