//! Translation of declarative constraint tags into schema keywords.
//!
//! Tags are never executed against data; they only decorate the schema
//! fragment. Each tag writes disjoint keywords except `NotEmpty`, which only
//! toggles the required flag, so application order does not affect the
//! result.

use crate::registry::ConstraintTag;
use crate::schema::SchemaFragment;

/// Apply constraint tags to a schema fragment and a required flag.
///
/// | Tag | Effect |
/// |---|---|
/// | `NotEmpty` | required flag set |
/// | `IsUuid` | `format: uuid` |
/// | `Length` | `minLength` / `maxLength` (absent bounds omitted) |
/// | `Range` | `minimum` / `maximum` (absent bounds omitted) |
/// | `IsEmail` | `format: email` |
/// | `IsUrl` | `format: uri` |
pub fn apply_constraints(tags: &[ConstraintTag], schema: &mut SchemaFragment, required: &mut bool) {
    for tag in tags {
        match tag {
            ConstraintTag::NotEmpty => *required = true,
            ConstraintTag::IsUuid => schema.format = Some("uuid".to_string()),
            ConstraintTag::Length { min, max } => {
                if let Some(min) = min {
                    schema.min_length = Some(*min);
                }
                if let Some(max) = max {
                    schema.max_length = Some(*max);
                }
            }
            ConstraintTag::Range { min, max } => {
                if let Some(min) = min {
                    schema.minimum = Some(*min);
                }
                if let Some(max) = max {
                    schema.maximum = Some(*max);
                }
            }
            ConstraintTag::IsEmail => schema.format = Some("email".to_string()),
            ConstraintTag::IsUrl => schema.format = Some("uri".to_string()),
        }
    }
}

/// Whether a UUID tag is present, for the scalar-path format override.
pub fn has_uuid_tag(tags: &[ConstraintTag]) -> bool {
    tags.iter().any(|tag| matches!(tag, ConstraintTag::IsUuid))
}
