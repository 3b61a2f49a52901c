//! The JSON reference-fixture format.
//!
//! A fixture captures one room tick as recorded from a live shard:
//! packed terrain, every object, user state, and the tick's intent
//! envelopes. Decoding yields a [`RoomSnapshot`] the processor can
//! replay deterministically.
//!
//! ```json
//! {
//!   "room": "W1N1",
//!   "gameTime": 100,
//!   "terrain": { "W1N1": "000..." },
//!   "users": [ { "id": "u1", "cpu": 100, "money": 50.0 } ],
//!   "objects": [
//!     { "id": "c1", "type": "creep", "x": 10, "y": 10, "user": "u1",
//!       "hits": 200, "hitsMax": 200, "body": ["work", "move"],
//!       "store": { "capacity": 50, "amounts": { "energy": 20 } } }
//!   ],
//!   "intents": [
//!     { "user": "u1",
//!       "objects": { "c1": [ { "name": "harvest", "args": { "id": "s1" } } ] },
//!       "moves": { "c1": 3 } }
//!   ]
//! }
//! ```

use std::error::Error;
use std::fmt;

use serde_json::Value;
use warren_core::{
    BodyPart, BodyPartKind, Direction, GameTime, IntentArgument, IntentEnvelope, IntentFieldValue,
    IntentRecord, MoveCommand, ObjectId, ResourceKind, RoomName, RoomPosition, SpawnOrder,
    TerminalSend, UserId, BODYPART_HITS,
};
use warren_model::{
    ControllerState, MineralState, ObjectKind, RoomObjectSnapshot, RoomSnapshot, SourceState,
    Store, StoreCapacity, UserState,
};

// ── FixtureError ───────────────────────────────────────────────────

/// Why a fixture failed to decode.
#[derive(Debug)]
pub enum FixtureError {
    /// The text is not valid JSON.
    Json(serde_json::Error),
    /// The JSON does not have the fixture shape.
    Shape {
        /// What was wrong.
        what: String,
    },
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "fixture is not valid JSON: {e}"),
            Self::Shape { what } => write!(f, "fixture shape error: {what}"),
        }
    }
}

impl Error for FixtureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Shape { .. } => None,
        }
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

fn shape(what: impl Into<String>) -> FixtureError {
    FixtureError::Shape { what: what.into() }
}

// ── decode helpers ─────────────────────────────────────────────────

fn str_field<'a>(obj: &'a Value, key: &str) -> Result<&'a str, FixtureError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| shape(format!("missing string field '{key}'")))
}

fn u64_field(obj: &Value, key: &str) -> Result<u64, FixtureError> {
    obj.get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| shape(format!("missing integer field '{key}'")))
}

fn opt_u32(obj: &Value, key: &str) -> Result<Option<u32>, FixtureError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| shape(format!("field '{key}' is not a u32"))),
    }
}

fn opt_time(obj: &Value, key: &str) -> Result<Option<GameTime>, FixtureError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(|n| Some(GameTime(n)))
            .ok_or_else(|| shape(format!("field '{key}' is not a tick"))),
    }
}

fn resource(code: &str) -> Result<ResourceKind, FixtureError> {
    ResourceKind::parse(code).ok_or_else(|| shape(format!("unknown resource '{code}'")))
}

// ── entry points ───────────────────────────────────────────────────

/// Decode a fixture from JSON text.
pub fn room_from_json(text: &str) -> Result<RoomSnapshot, FixtureError> {
    room_from_value(&serde_json::from_str(text)?)
}

/// Decode a fixture from an already-parsed JSON value.
pub fn room_from_value(value: &Value) -> Result<RoomSnapshot, FixtureError> {
    let room_name = RoomName::from(str_field(value, "room")?);
    let tick = GameTime(u64_field(value, "gameTime")?);
    let mut snap = RoomSnapshot::empty(room_name, tick);

    if let Some(terrain) = value.get("terrain").and_then(Value::as_object) {
        for (room, packed) in terrain {
            let packed = packed
                .as_str()
                .ok_or_else(|| shape("terrain values must be packed strings"))?;
            snap.terrain
                .insert(RoomName::from(room.as_str()), packed.to_string());
        }
    }

    for user in value
        .get("users")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let state = decode_user(user)?;
        snap.users.insert(state.id.clone(), state);
    }

    for object in value
        .get("objects")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let decoded = decode_object(object, &snap.room)?;
        snap.objects.insert(decoded.id.clone(), decoded);
    }

    for envelope in value
        .get("intents")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        snap.intents.push(decode_envelope(envelope)?);
    }

    Ok(snap)
}

// ── users ──────────────────────────────────────────────────────────

fn decode_user(value: &Value) -> Result<UserState, FixtureError> {
    let mut state = UserState::new(UserId::from(str_field(value, "id")?));
    if let Some(cpu) = opt_u32(value, "cpu")? {
        state.cpu = cpu;
    }
    if let Some(money) = value.get("money").and_then(Value::as_f64) {
        state.money = money;
    }
    if let Some(power) = value.get("power").and_then(Value::as_f64) {
        state.power = power;
    }
    if let Some(active) = value.get("active").and_then(Value::as_bool) {
        state.active = active;
    }
    Ok(state)
}

// ── objects ────────────────────────────────────────────────────────

fn decode_object(value: &Value, room: &RoomName) -> Result<RoomObjectSnapshot, FixtureError> {
    let id = ObjectId::from(str_field(value, "id")?);
    let kind_tag = str_field(value, "type")?;
    let kind =
        ObjectKind::parse(kind_tag).ok_or_else(|| shape(format!("unknown type '{kind_tag}'")))?;
    let x = u64_field(value, "x")?;
    let y = u64_field(value, "y")?;
    let pos = u8::try_from(x)
        .ok()
        .zip(u8::try_from(y).ok())
        .and_then(|(x, y)| RoomPosition::new(x, y))
        .ok_or_else(|| shape(format!("position ({x},{y}) out of bounds")))?;

    let mut obj = RoomObjectSnapshot::new(id, kind, room.clone(), pos);
    if let Some(user) = value.get("user").and_then(Value::as_str) {
        obj.user = Some(UserId::from(user));
    }
    obj.hits = opt_u32(value, "hits")?;
    obj.hits_max = opt_u32(value, "hitsMax")?;
    obj.spawning = value
        .get("spawning")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    obj.age_time = opt_time(value, "ageTime")?;
    obj.cooldown_until = opt_time(value, "cooldownUntil")?;
    obj.next_decay = opt_time(value, "nextDecay")?;
    obj.is_public = value.get("isPublic").and_then(Value::as_bool);
    if let Some(code) = value.get("resource").and_then(Value::as_str) {
        obj.resource_kind = Some(resource(code)?);
    }

    for part in value
        .get("body")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        let tag = part
            .as_str()
            .ok_or_else(|| shape("body entries must be part names"))?;
        let kind =
            BodyPartKind::parse(tag).ok_or_else(|| shape(format!("unknown body part '{tag}'")))?;
        obj.body.push(BodyPart {
            kind,
            hits: BODYPART_HITS,
            boost: None,
        });
    }

    if let Some(store) = value.get("store") {
        obj.store = Some(decode_store(store)?);
    }
    if let Some(controller) = value.get("controller") {
        obj.controller = Some(decode_controller(controller)?);
    }
    if let Some(source) = value.get("source") {
        obj.source = Some(SourceState {
            energy: opt_u32(source, "energy")?.unwrap_or(0),
            energy_capacity: opt_u32(source, "energyCapacity")?.unwrap_or(0),
            next_regen: opt_time(source, "nextRegen")?,
        });
    }
    if let Some(mineral) = value.get("mineral") {
        obj.mineral = Some(MineralState {
            kind: resource(str_field(mineral, "resource")?)?,
            amount: opt_u32(mineral, "amount")?.unwrap_or(0),
            density: opt_u32(mineral, "density")?.unwrap_or(0),
            next_regen: opt_time(mineral, "nextRegen")?,
        });
    }

    Ok(obj)
}

fn decode_store(value: &Value) -> Result<Store, FixtureError> {
    let capacity = match value.get("capacity") {
        None | Some(Value::Null) => StoreCapacity::Unbounded,
        Some(Value::String(s)) if s == "unbounded" => StoreCapacity::Unbounded,
        Some(Value::Number(n)) => {
            let total = n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| shape("store capacity is not a u32"))?;
            StoreCapacity::Total(total)
        }
        Some(Value::Object(map)) => {
            let mut per = indexmap::IndexMap::new();
            for (code, cap) in map {
                let cap = cap
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| shape("per-resource capacity is not a u32"))?;
                per.insert(resource(code)?, cap);
            }
            StoreCapacity::PerResource(per)
        }
        Some(other) => return Err(shape(format!("unsupported store capacity {other}"))),
    };
    let mut store = Store::empty(capacity);
    for (code, amount) in value
        .get("amounts")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
    {
        let amount = amount
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| shape("store amount is not a u32"))?;
        store = store
            .with_added(resource(code)?, amount)
            .map_err(|e| shape(format!("store contents exceed capacity: {e}")))?;
    }
    Ok(store)
}

fn decode_controller(value: &Value) -> Result<ControllerState, FixtureError> {
    Ok(ControllerState {
        level: opt_u32(value, "level")?.unwrap_or(0),
        progress: opt_u32(value, "progress")?.unwrap_or(0),
        downgrade_time: opt_time(value, "downgradeTime")?,
        safe_mode_until: opt_time(value, "safeModeUntil")?,
        safe_modes_available: opt_u32(value, "safeModesAvailable")?.unwrap_or(0),
        ..ControllerState::default()
    })
}

// ── intents ────────────────────────────────────────────────────────

fn decode_envelope(value: &Value) -> Result<IntentEnvelope, FixtureError> {
    let mut envelope = IntentEnvelope::for_user(UserId::from(str_field(value, "user")?));

    for (object, records) in value
        .get("objects")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
    {
        let records = records
            .as_array()
            .ok_or_else(|| shape("object intents must be arrays"))?;
        for record in records {
            envelope.push_intent(ObjectId::from(object.as_str()), decode_record(record)?);
        }
    }

    for (creep, direction) in value
        .get("moves")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
    {
        let direction = direction
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(Direction::from_number)
            .ok_or_else(|| shape("move directions are 1..=8"))?;
        envelope
            .moves
            .insert(ObjectId::from(creep.as_str()), MoveCommand { direction });
    }

    for (spawn, order) in value
        .get("spawns")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
    {
        let mut body = Vec::new();
        for part in order
            .get("body")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            let tag = part
                .as_str()
                .ok_or_else(|| shape("spawn body entries must be part names"))?;
            body.push(
                BodyPartKind::parse(tag)
                    .ok_or_else(|| shape(format!("unknown body part '{tag}'")))?,
            );
        }
        envelope.spawn_orders.insert(
            ObjectId::from(spawn.as_str()),
            SpawnOrder {
                body: body.into_iter().collect(),
                creep_name: str_field(order, "name")?.to_string(),
            },
        );
    }

    for (terminal, send) in value
        .get("sends")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
    {
        envelope.sends.insert(
            ObjectId::from(terminal.as_str()),
            TerminalSend {
                to_room: RoomName::from(str_field(send, "to")?),
                resource: resource(str_field(send, "resource")?)?,
                amount: opt_u32(send, "amount")?
                    .ok_or_else(|| shape("send amount is required"))?,
                description: send
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
        );
    }

    Ok(envelope)
}

fn decode_record(value: &Value) -> Result<IntentRecord, FixtureError> {
    let name = str_field(value, "name")?;
    let mut argument = IntentArgument::default();
    for (field, raw) in value
        .get("args")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
    {
        argument
            .fields
            .insert(field.clone(), decode_field_value(raw)?);
    }
    Ok(IntentRecord::single(name, argument))
}

fn decode_field_value(value: &Value) -> Result<IntentFieldValue, FixtureError> {
    Ok(match value {
        Value::String(s) => IntentFieldValue::Text(s.clone()),
        Value::Number(n) => IntentFieldValue::Number(
            n.as_f64()
                .ok_or_else(|| shape("argument number out of range"))?,
        ),
        Value::Bool(b) => IntentFieldValue::Bool(*b),
        Value::Array(items) => decode_array_value(items)?,
        other => return Err(shape(format!("unsupported argument value {other}"))),
    })
}

// Arrays of strings decode as body parts when every element names one,
// since the only array-of-text intents on the wire are body lists.
fn decode_array_value(items: &[Value]) -> Result<IntentFieldValue, FixtureError> {
    if items.iter().all(|v| v.is_string()) {
        let texts: Vec<String> = items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        let parts: Vec<BodyPartKind> = texts
            .iter()
            .filter_map(|t| BodyPartKind::parse(t))
            .collect();
        if parts.len() == texts.len() {
            return Ok(IntentFieldValue::BodyParts(parts));
        }
        return Ok(IntentFieldValue::TextArray(texts));
    }
    if items.iter().all(Value::is_number) {
        return Ok(IntentFieldValue::NumberArray(
            items.iter().filter_map(Value::as_f64).collect(),
        ));
    }
    if items.iter().all(Value::is_boolean) {
        return Ok(IntentFieldValue::BoolArray(
            items.iter().filter_map(Value::as_bool).collect(),
        ));
    }
    Err(shape("argument arrays must be homogeneous"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "room": "W1N1",
        "gameTime": 100,
        "users": [ { "id": "u1", "cpu": 100, "money": 25.5 } ],
        "objects": [
            { "id": "s1", "type": "source", "x": 10, "y": 20,
              "source": { "energy": 3000, "energyCapacity": 3000 } },
            { "id": "c1", "type": "creep", "x": 11, "y": 20, "user": "u1",
              "hits": 200, "hitsMax": 200, "body": ["work", "work", "move"],
              "store": { "capacity": 50, "amounts": { "energy": 10 } } }
        ],
        "intents": [
            { "user": "u1",
              "objects": { "c1": [ { "name": "harvest", "args": { "id": "s1" } } ] },
              "moves": { "c1": 3 } }
        ]
    }"#;

    #[test]
    fn full_fixture_decodes() {
        let snap = room_from_json(FIXTURE).unwrap();
        assert_eq!(snap.room, RoomName::from("W1N1"));
        assert_eq!(snap.game_time, GameTime(100));
        assert_eq!(snap.objects.len(), 2);

        let creep = snap.object(&ObjectId::from("c1")).unwrap();
        assert_eq!(creep.body.len(), 3);
        assert_eq!(creep.store.as_ref().unwrap().energy(), 10);
        assert_eq!(snap.users[&UserId::from("u1")].money, 25.5);

        let envelope = &snap.intents[0];
        assert_eq!(envelope.object_intents[&ObjectId::from("c1")][0].name, "harvest");
        assert_eq!(
            envelope.moves[&ObjectId::from("c1")].direction,
            Direction::Right
        );
    }

    #[test]
    fn body_part_arrays_are_recognized() {
        let v = serde_json::json!(["work", "carry", "move"]);
        let decoded = decode_field_value(&v).unwrap();
        assert_eq!(
            decoded,
            IntentFieldValue::BodyParts(vec![
                BodyPartKind::Work,
                BodyPartKind::Carry,
                BodyPartKind::Move
            ])
        );
    }

    #[test]
    fn out_of_bounds_position_is_a_shape_error() {
        let bad = r#"{ "room": "W1N1", "gameTime": 1,
            "objects": [ { "id": "x", "type": "creep", "x": 99, "y": 0 } ] }"#;
        assert!(matches!(
            room_from_json(bad),
            Err(FixtureError::Shape { .. })
        ));
    }

    #[test]
    fn garbage_is_a_json_error()  {
        assert!(matches!(
            room_from_json("not json"),
            Err(FixtureError::Json(_))
        ));
    }
}
