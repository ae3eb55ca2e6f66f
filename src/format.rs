//! Translation of core results into the public wire schema.
//!
//! Pelias features and index hits both carry the BeSt payload inside an
//! `addendum.best` wrapper; the formatter decodes it and lifts its
//! sub-objects (street, municipality, postal info, box info) into the
//! documented item shape. Fields that are absent upstream stay absent in the
//! output rather than appearing as nulls.

use serde_json::{json, Map, Value};

use crate::models::{CanonicalRecord, GeocodeOutcome};

/// Shape a geocoding outcome for the wire.
pub fn geocode_response(outcome: &GeocodeOutcome, with_pelias_raw: bool) -> Value {
    let mut body = Map::new();
    body.insert(
        "items".into(),
        Value::Array(outcome.items.iter().map(item_from_feature).collect()),
    );
    if with_pelias_raw {
        body.insert("peliasRaw".into(), outcome.pelias_raw.clone());
    }
    body.insert("callType".into(), json!(outcome.call_type));
    body.insert("inAddr".into(), outcome.in_addr.clone());
    body.insert("peliasCallCount".into(), json!(outcome.pelias_call_count));
    body.insert("transformers".into(), json!(outcome.transformers.join(";")));

    Value::Object(body)
}

/// Shape a canonical-record sequence for the wire.
///
/// Records go through the same item lifting as geocode features; the raw
/// `properties.addendum` wrapper never reaches the wire.
pub fn records_response(records: &[CanonicalRecord]) -> Value {
    json!({
        "items": records.iter().map(item_from_record).collect::<Vec<_>>()
    })
}

/// Map one Pelias feature into the public item shape.
fn item_from_feature(feature: &Value) -> Value {
    let properties = &feature["properties"];
    let best = decoded_best(properties);

    let mut item = best.as_ref().map(best_fields).unwrap_or_default();

    if !item.contains_key("bestId") {
        put(&mut item, "bestId", properties.get("id").cloned());
    }
    if !item.contains_key("housenumber") {
        put(&mut item, "housenumber", properties.get("housenumber").cloned());
    }
    put(&mut item, "precision", properties.get("layer").cloned());
    put(
        &mut item,
        "coordinates",
        lift_coordinates(&feature["geometry"]["coordinates"]),
    );

    // Only surface the raw display name when there is no BeSt payload to
    // build a structured record from.
    if best.is_none() {
        put(&mut item, "name", properties.get("name").cloned());
    }

    Value::Object(item)
}

/// Map one canonical record into the public item shape.
fn item_from_record(record: &CanonicalRecord) -> Value {
    let mut item = best_fields(&record.properties.addendum.best);

    if let Some(geometry) = &record.geometry {
        put(&mut item, "coordinates", lift_coordinates(&geometry.coordinates));
    }

    Value::Object(item)
}

/// Lift the documented item keys out of a decoded BeSt payload.
fn best_fields(best: &Value) -> Map<String, Value> {
    let mut item = Map::new();

    put(&mut item, "bestId", best.get("best_id").cloned());
    put(&mut item, "street", best.get("street").cloned());
    put(&mut item, "municipality", best.get("municipality").cloned());
    put(
        &mut item,
        "partOfMunicipality",
        best.get("part_of_municipality").cloned(),
    );
    put(&mut item, "postalInfo", best.get("postal_info").cloned());
    put(&mut item, "housenumber", best.get("housenumber").cloned());
    put(&mut item, "status", best.get("status").cloned());
    put(&mut item, "boxInfo", best.get("box_info").cloned());

    item
}

fn put(item: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value.filter(|v| !v.is_null()) {
        item.insert(key.to_string(), value);
    }
}

/// Normalize coordinates into `{lat, lon}`.
///
/// Index hits carry `center_point` as a `{lat, lon}` object; GeoJSON
/// features carry a `[lon, lat]` array.
fn lift_coordinates(value: &Value) -> Option<Value> {
    if let (Some(lat), Some(lon)) = (
        value.get("lat").and_then(Value::as_f64),
        value.get("lon").and_then(Value::as_f64),
    ) {
        return Some(json!({ "lat": lat, "lon": lon }));
    }

    let array = value.as_array()?;
    let lon = array.first().and_then(Value::as_f64)?;
    let lat = array.get(1).and_then(Value::as_f64)?;
    Some(json!({ "lat": lat, "lon": lon }))
}

/// The decoded `addendum.best` payload of a feature, whether the index
/// returned it serialized or already expanded.
fn decoded_best(properties: &Value) -> Option<Value> {
    let best = properties.get("addendum")?.get("best")?;
    match best {
        Value::String(raw) => serde_json::from_str(raw).ok(),
        other => Some(other.clone()),
    }
}
