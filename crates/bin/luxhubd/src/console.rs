//! Stdin console — lets a person play the devices of the virtual host.
//!
//! Each line is `<entity_id>=<value>`, e.g. `binary_sensor.kitchen_motion=on`
//! or `sensor.kitchen_lux=250`. Blank lines and `#` comments are ignored.

use luxhub_domain::error::ValidationError;
use luxhub_domain::id::EntityId;
use luxhub_domain::state::StateValue;

/// A console line that could not be understood.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("expected `<entity_id>=<value>`")]
    Malformed,

    #[error(transparent)]
    Entity(#[from] ValidationError),
}

/// Parse one console line; `Ok(None)` for lines with nothing to do.
///
/// # Errors
///
/// Returns [`CommandError`] when the line is not an assignment to a valid
/// entity id.
pub fn parse_line(line: &str) -> Result<Option<(EntityId, StateValue)>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (entity, value) = line.split_once('=').ok_or(CommandError::Malformed)?;
    let entity = EntityId::new(entity.trim())?;
    Ok(Some((entity, StateValue::parse(value))))
}
