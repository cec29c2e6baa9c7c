//! Unit tests for the overlay builder.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde_json::{Map, Value, json};

use super::{ArrayItem, Entry, MapScope, Overlay, array_literal, make_type_safe_map, merge_maps};
use crate::error::{DslError, DslResult, MergeError};
use crate::node::{MapNode, TreeNode, flatten};
use crate::settings::MergeSettings;

fn object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("expected an object, found {other}")),
    }
}

fn status(scope: &mut MapScope<'_>) -> DslResult<()> {
    scope
        .set("Health", "Sick")
        .set("HealthRollup", "Unrolled")
        .set("State", "Indeterminate");
    Ok(())
}

#[test]
fn nested_blocks_render_as_nested_maps() -> Result<()> {
    let overlay = Overlay::build(|system| {
        system.object("Status", status)?.set("Name", "System1");
        Ok(())
    })?;
    assert_eq!(
        overlay.to_value(),
        json!({
            "Status": {"Health": "Sick", "HealthRollup": "Unrolled", "State": "Indeterminate"},
            "Name": "System1"
        })
    );
    Ok(())
}

#[test]
fn keys_after_a_block_land_in_the_enclosing_map() -> Result<()> {
    let overlay = Overlay::build(|root| {
        root.object("A", |a| {
            a.object("B", |b| {
                b.set("C", 1);
                Ok(())
            })?;
            a.set("D", 2);
            Ok(())
        })?;
        root.set("E", 3);
        Ok(())
    })?;
    assert_eq!(overlay.to_value(), json!({"A": {"B": {"C": 1}, "D": 2}, "E": 3}));
    Ok(())
}

#[test]
fn rebinding_a_key_replaces_it() -> Result<()> {
    let overlay = Overlay::build(|root| {
        root.set("Name", "first").set("Name", "second");
        Ok(())
    })?;
    assert_eq!(overlay.to_map()?, object(json!({"Name": "second"}))?);
    Ok(())
}

#[test]
fn empty_block_renders_as_empty_object() -> Result<()> {
    let overlay = Overlay::build(|root| {
        root.object("Oem", |_| Ok(()))?;
        Ok(())
    })?;
    assert_eq!(overlay.to_value(), json!({"Oem": {}}));
    Ok(())
}

#[test]
fn null_values_are_kept() -> Result<()> {
    let overlay = Overlay::build(|root| {
        root.set("AlternativeFirmware", Value::Null).set("Brand", "X505");
        Ok(())
    })?;
    assert_eq!(
        overlay.to_value(),
        json!({"AlternativeFirmware": null, "Brand": "X505"})
    );
    Ok(())
}

#[test]
fn blocks_inside_arrays_open_fresh_maps() -> Result<()> {
    let overlay = Overlay::build(|processor| {
        processor.array(
            "Configurations",
            [
                ArrayItem::block(|config| {
                    config
                        .set("ConfigurationId", 1)
                        .set("TDP", 120)
                        .set("MaxJunctionTempCelsius", 90_i64);
                    Ok(())
                }),
                ArrayItem::block(|config| {
                    config.set("ConfigurationId", 2);
                    Ok(())
                }),
            ],
        )?;
        processor.set("Name", "SpeedSelect_2");
        Ok(())
    })?;
    assert_eq!(
        overlay.to_value(),
        json!({
            "Configurations": [
                {"ConfigurationId": 1, "TDP": 120, "MaxJunctionTempCelsius": 90},
                {"ConfigurationId": 2}
            ],
            "Name": "SpeedSelect_2"
        })
    );
    Ok(())
}

#[test]
fn sole_empty_marker_yields_empty_array() -> Result<()> {
    let array = array_literal([ArrayItem::Empty])?;
    ensure!(array.is_empty(), "expected an empty array, found {array:?}");
    Ok(())
}

#[test]
fn no_items_yields_empty_array() -> Result<()> {
    let array = array_literal(Vec::<ArrayItem<'_>>::new())?;
    ensure!(array.is_empty(), "expected an empty array, found {array:?}");
    Ok(())
}

#[rstest]
#[case::empty_first(vec![ArrayItem::Empty, ArrayItem::from("Id1")])]
#[case::empty_last(vec![ArrayItem::from("Id1"), ArrayItem::Empty])]
#[case::twice(vec![ArrayItem::Empty, ArrayItem::Empty])]
fn empty_marker_must_stand_alone(#[case] items: Vec<ArrayItem<'static>>) {
    let result = array_literal(items);
    assert!(matches!(result, Err(DslError::EmptyNotSole)), "{result:?}");
}

#[test]
fn nested_array_literals_are_rejected() {
    let result = array_literal([ArrayItem::Array(vec![ArrayItem::from("Id1")])]);
    assert!(matches!(result, Err(DslError::NestedArray)), "{result:?}");
}

#[test]
fn spread_items_drop_nulls() -> Result<()> {
    let ids = ["Id1", "", "Id3"]
        .into_iter()
        .map(|id| (!id.is_empty()).then(|| Value::from(id)));
    let array = array_literal([ArrayItem::spread(ids), ArrayItem::value("Id4")])?;
    assert_eq!(flatten(&TreeNode::Array(array)), json!(["Id1", "Id3", "Id4"]));
    Ok(())
}

#[test]
fn object_values_inside_arrays_become_maps() -> Result<()> {
    let array = array_literal([ArrayItem::from(json!({"@odata.id": "/redfish/v1/Chassis/1"}))])?;
    let first = array.iter().next().ok_or_else(|| anyhow!("array is empty"))?;
    ensure!(first.is_map(), "expected a map, found {}", first.kind());
    Ok(())
}

#[test]
fn empty_marker_outside_array_names_the_key() {
    let result = Overlay::build(|root| {
        root.bind("PCIeConnectionId", Entry::Empty)?;
        Ok(())
    });
    let err = result.err().map(|err| err.to_string());
    assert_eq!(
        err.as_deref(),
        Some("can't map 'PCIeConnectionId' to <empty>, <empty> can exist only in array")
    );
}

#[test]
fn bind_dispatches_on_entry_kind() -> Result<()> {
    let overlay = Overlay::build(|root| {
        root.bind("Name", Entry::from(json!("System1")))?
            .bind(
                "Status",
                Entry::Object(Box::new(|status: &mut MapScope<'_>| {
                    status.set("State", "Enabled");
                    Ok(())
                })),
            )?
            .bind("BootOrder", Entry::Array(vec![ArrayItem::Empty]))?;
        ensure_scope_size(root, 3)
    })?;
    assert_eq!(
        overlay.to_value(),
        json!({"Name": "System1", "Status": {"State": "Enabled"}, "BootOrder": []})
    );
    Ok(())
}

fn ensure_scope_size(scope: &MapScope<'_>, expected: usize) -> DslResult<()> {
    assert_eq!(scope.len(), expected);
    assert!(scope.contains_key("Status"));
    Ok(())
}

#[test]
fn block_errors_abort_the_build() {
    let result = Overlay::build(|root| {
        root.set("Name", "System1");
        root.object("Oem", |oem| {
            oem.array("Ids", [ArrayItem::Empty, ArrayItem::from("Id1")])?;
            Ok(())
        })?;
        Ok(())
    });
    assert!(matches!(result, Err(DslError::EmptyNotSole)), "{result:?}");
}

#[test]
fn apply_overrides_additively() -> Result<()> {
    let mut system = object(json!({
        "Status": {"Health": "Sick", "HealthRollup": "Unrolled", "State": "Indeterminate"}
    }))?;
    Overlay::build(|root| {
        root.object("Status", |status| {
            status.set("State", "Disabled");
            Ok(())
        })?;
        Ok(())
    })?
    .apply_to(&mut system)?;
    assert_eq!(
        Value::Object(system),
        json!({"Status": {"Health": "Sick", "HealthRollup": "Unrolled", "State": "Disabled"}})
    );
    Ok(())
}

#[test]
fn apply_replaces_object_with_primitive() -> Result<()> {
    let mut target = object(json!({"A": {"B": 2}, "C": 3}))?;
    Overlay::build(|root| {
        root.set("A", 1);
        Ok(())
    })?
    .apply_to(&mut target)?;
    assert_eq!(Value::Object(target), json!({"A": 1, "C": 3}));
    Ok(())
}

#[test]
fn apply_empties_value_array() -> Result<()> {
    let mut processor = object(json!({
        "Oem": {"Custom_Company": {"PCIeConnectionId": ["Id1", "Id2", "Id3"]}}
    }))?;
    Overlay::build(|root| {
        root.object("Oem", |oem| {
            oem.object("Custom_Company", |company| {
                company.array("PCIeConnectionId", [ArrayItem::Empty])?;
                Ok(())
            })?;
            Ok(())
        })?;
        Ok(())
    })?
    .apply_to(&mut processor)?;
    assert_eq!(
        processor.get("Oem").cloned(),
        Some(json!({"Custom_Company": {"PCIeConnectionId": []}}))
    );
    Ok(())
}

#[test]
fn apply_with_settings_removes_absent_properties() -> Result<()> {
    let mut target = object(json!({"Id": "1", "Name": "System1", "Model": "X"}))?;
    let overlay = Overlay::build(|root| {
        root.set("Name", "System2");
        Ok(())
    })?;
    let settings = MergeSettings {
        remove_absent_properties: true,
        ..MergeSettings::default()
    };
    overlay.apply_with(&mut target, settings)?;
    assert_eq!(Value::Object(target), json!({"Id": "1", "Name": "System2"}));
    Ok(())
}

#[test]
fn non_map_overlays_cannot_be_applied() -> Result<()> {
    let overlay = Overlay::from_node(TreeNode::Array(array_literal([ArrayItem::from("x")])?));
    let mut target = Map::new();
    let result = overlay.apply_to(&mut target);
    assert!(
        matches!(result, Err(DslError::NotAMap { kind: "array" })),
        "{result:?}"
    );
    assert!(matches!(overlay.to_map(), Err(DslError::NotAMap { .. })));
    Ok(())
}

#[test]
fn merge_errors_propagate_unchanged() -> Result<()> {
    let mut target = object(json!({"Boot": {}}))?;
    let src = object(json!({"Boot@removed": false}))?;
    let result = merge_maps(&mut target, &src);
    match result {
        Err(DslError::Merge(MergeError::InvalidRemoval { key })) => {
            assert_eq!(key, "Boot@removed");
            Ok(())
        }
        other => Err(anyhow!("expected an invalid removal error, found {other:?}")),
    }
}

#[test]
fn merge_maps_deep_merges() -> Result<()> {
    let mut dest = object(json!({"Status": {"Health": "OK"}, "Name": "System1"}))?;
    let src = object(json!({"Status": {"State": "Enabled"}}))?;
    merge_maps(&mut dest, &src)?;
    assert_eq!(
        Value::Object(dest),
        json!({"Status": {"Health": "OK", "State": "Enabled"}, "Name": "System1"})
    );
    Ok(())
}

#[test]
fn type_safe_map_stringifies_keys() {
    let map = make_type_safe_map([(1, "one"), (2, "two")]);
    assert_eq!(Value::Object(map), json!({"1": "one", "2": "two"}));
}

#[test]
fn default_overlay_is_an_empty_map() {
    let overlay = Overlay::default();
    assert!(overlay.is_map());
    assert_eq!(overlay.root(), &TreeNode::Map(MapNode::new()));
}
