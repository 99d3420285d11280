// crates/canopen-od/src/validation/values.rs

use super::{Finding, FindingCode, RuleContext};
use crate::error::{Cancelled, ValueError};
use crate::od::{OdSubObject, OdValue, parse_value};
use core::cmp::Ordering;

pub(super) fn check_values(
    ctx: &RuleContext<'_>,
    findings: &mut Vec<Finding>,
) -> Result<(), Cancelled> {
    for (index, object) in ctx.device.object_dictionary.iter() {
        ctx.checkpoint()?;
        for (sub_index, sub) in &object.sub_objects {
            check_sub(ctx, index, *sub_index, sub, findings);
        }
    }
    Ok(())
}

fn check_sub(
    ctx: &RuleContext<'_>,
    index: u16,
    sub_index: u8,
    sub: &OdSubObject,
    findings: &mut Vec<Finding>,
) {
    let mut report = |finding: Finding| findings.push(finding.at(index, Some(sub_index)));
    let parse = |text: &str| parse_value(sub.data_type, text, ctx.node_id);

    let default = match sub.parsed_default(ctx.node_id) {
        Ok(value) => Some(value),
        Err(err) => {
            report(value_finding(err, "Default value", FindingCode::DefaultUnparseable));
            None
        }
    };
    if let Some(actual) = &sub.actual_value
        && let Err(err) = parse(actual)
    {
        report(value_finding(err, "Actual value", FindingCode::DefaultUnparseable));
    }

    let mut limit = |text: &Option<String>, label: &str| -> Option<OdValue> {
        let text = text.as_deref()?;
        match parse(text) {
            Ok(value) => Some(value),
            Err(err) => {
                report(value_finding(err, label, FindingCode::LimitUnparseable));
                None
            }
        }
    };
    let low = limit(&sub.low_limit, "Low limit");
    let high = limit(&sub.high_limit, "High limit");

    // Strings and domains have no order.
    let ordered = sub.data_type.is_numeric();

    if ordered
        && let (Some(low), Some(high)) = (&low, &high)
        && low.compare(high) == Some(Ordering::Greater)
    {
        report(Finding::error(
            FindingCode::LimitsInverted,
            format!(
                "Low limit {} is greater than high limit {}",
                sub.low_limit.as_deref().unwrap_or_default(),
                sub.high_limit.as_deref().unwrap_or_default()
            ),
        ));
    }

    if ordered && let Some(default) = &default {
        let below = low
            .as_ref()
            .is_some_and(|low| default.compare(low) == Some(Ordering::Less));
        let above = high
            .as_ref()
            .is_some_and(|high| default.compare(high) == Some(Ordering::Greater));
        if below || above {
            report(Finding::warning(
                FindingCode::DefaultOutsideLimits,
                format!(
                    "Default value {} lies outside the limits [{}, {}]",
                    sub.default_value,
                    sub.low_limit.as_deref().unwrap_or("-"),
                    sub.high_limit.as_deref().unwrap_or("-")
                ),
            ));
        }
    }

    if sub.is_pdo_mappable() && sub.data_type.bit_length().is_none() {
        report(Finding::error(
            FindingCode::PdoMappableWithoutLength,
            format!(
                "'{}' is PDO-mappable but {} has no fixed bit length",
                sub.name, sub.data_type
            ),
        ));
    }
}

/// Out-of-range values always use `ValueOutOfRange`; `unparseable` is the
/// code for values that do not fit the grammar at all.
fn value_finding(err: ValueError, label: &str, unparseable: FindingCode) -> Finding {
    match err {
        ValueError::Unparseable { .. } => Finding::error(unparseable, format!("{label}: {err}")),
        ValueError::OutOfRange { .. } => {
            Finding::error(FindingCode::ValueOutOfRange, format!("{label}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::device::Device;
    use crate::od::{OdObject, OdSubObject};
    use crate::types::{AccessPdo, AccessSdo, DataType};
    use crate::validation::{FindingCode, Severity, ValidationOptions, validate};

    fn findings_for(sub: OdSubObject) -> Vec<(FindingCode, Severity)> {
        let mut device = Device::minimal_profile();
        device.object_dictionary.insert(0x2000, OdObject::var("Value", sub));
        validate(&device, &ValidationOptions::default())
            .into_iter()
            .filter(|f| f.index == Some(0x2000))
            .map(|f| (f.code, f.severity))
            .collect()
    }

    #[test]
    fn test_out_of_range_default() {
        let sub = OdSubObject::new("Value", DataType::Unsigned8, AccessSdo::ReadWrite, "256");
        assert_eq!(
            findings_for(sub),
            vec![(FindingCode::ValueOutOfRange, Severity::Error)]
        );
    }

    #[test]
    fn test_unparseable_values() {
        let mut sub = OdSubObject::new("Value", DataType::Integer16, AccessSdo::ReadWrite, "x");
        sub.low_limit = Some("low".into());
        assert_eq!(
            findings_for(sub),
            vec![
                (FindingCode::DefaultUnparseable, Severity::Error),
                (FindingCode::LimitUnparseable, Severity::Error)
            ]
        );
    }

    #[test]
    fn test_limits() {
        let inverted = OdSubObject::new("Value", DataType::Integer16, AccessSdo::ReadWrite, "0")
            .with_limits("10", "-10");
        let found = findings_for(inverted);
        assert!(found.contains(&(FindingCode::LimitsInverted, Severity::Error)));

        let outside = OdSubObject::new("Value", DataType::Integer16, AccessSdo::ReadWrite, "50")
            .with_limits("-10", "10");
        assert_eq!(
            findings_for(outside),
            vec![(FindingCode::DefaultOutsideLimits, Severity::Warning)]
        );

        let inside = OdSubObject::new("Value", DataType::Real32, AccessSdo::ReadWrite, "0.5")
            .with_limits("0.0", "1.0");
        assert!(findings_for(inside).is_empty());
    }

    #[test]
    fn test_mappable_string_has_no_length() {
        let sub = OdSubObject::new("Name", DataType::VisibleString, AccessSdo::ReadOnly, "abc")
            .with_access_pdo(AccessPdo::Optional);
        assert_eq!(
            findings_for(sub),
            vec![(FindingCode::PdoMappableWithoutLength, Severity::Error)]
        );
    }
}
