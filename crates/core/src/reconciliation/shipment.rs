//! Pure shipment-derivation helpers
//!
//! Everything here is request-scoped arithmetic over already-parsed records;
//! no I/O, no state.

use std::collections::HashMap;

use frostlink_domain::{DeliveryOrder, ShipmentStatus};

/// Index deliveries by every sales-order code they reference.
///
/// One delivery may fulfil several orders jointly, so the same index entry
/// can appear under multiple codes. Values are positions into the input
/// slice.
pub fn build_code_index(deliveries: &[DeliveryOrder]) -> HashMap<&str, Vec<usize>> {
    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (position, delivery) in deliveries.iter().enumerate() {
        for code in &delivery.order_codes {
            index.entry(code.as_str()).or_default().push(position);
        }
    }
    index
}

/// Classify an order's shipment status from its matched deliveries.
pub fn classify_shipment(matches: &[&DeliveryOrder]) -> ShipmentStatus {
    if matches.is_empty() {
        return ShipmentStatus::None;
    }
    let shipped = matches.iter().filter(|delivery| delivery.shipped).count();
    if shipped == 0 {
        ShipmentStatus::None
    } else if shipped == matches.len() {
        ShipmentStatus::Full
    } else {
        ShipmentStatus::Partial
    }
}

/// Fraction of the order value covered by shipped deliveries.
///
/// Clamped to [0, 1]: a joint delivery carries value for several orders at
/// once, so the shipped sum can legitimately exceed one order's amount.
/// Non-positive order amounts yield 0 rather than a division error.
pub fn shipped_rate(order_amount: f64, matches: &[&DeliveryOrder]) -> f64 {
    if order_amount <= 0.0 {
        return 0.0;
    }
    let shipped_sum: f64 = matches
        .iter()
        .filter(|delivery| delivery.shipped)
        .map(|delivery| delivery.rmb_amount)
        .sum();
    (shipped_sum / order_amount).clamp(0.0, 1.0)
}

/// Resolve a raw attachment entry (`"<path>#<query>"`) to an absolute URL.
///
/// Everything from the first `#` onward is display metadata and is discarded;
/// the remainder is served below the tenant app's file base.
pub fn normalize_attachment(entry: &str, file_base_url: &str, app_name: &str) -> String {
    let path = entry.split('#').next().unwrap_or(entry);
    format!(
        "{}/{}/{}",
        file_base_url.trim_end_matches('/'),
        app_name,
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use frostlink_domain::FieldMap;
    use serde_json::json;

    use super::*;

    fn delivery(codes: &str, shipped: bool, rmb_amount: f64) -> DeliveryOrder {
        let record: FieldMap = json!({
            "id": "D",
            "code": "DN",
            "orderCodes": codes,
            "是否发货": shipped,
            "rmbAmount": rmb_amount,
        })
        .as_object()
        .cloned()
        .unwrap();
        DeliveryOrder::from_record(&record).unwrap()
    }

    #[test]
    fn index_lists_delivery_under_every_referenced_code() {
        let deliveries = vec![delivery("SO1, SO2,SO3", true, 10.0)];
        let index = build_code_index(&deliveries);
        assert_eq!(index.len(), 3);
        for code in ["SO1", "SO2", "SO3"] {
            assert_eq!(index[code], vec![0]);
        }
    }

    #[test]
    fn classification_covers_none_partial_and_full() {
        let all = vec![
            delivery("SO1", false, 10.0),
            delivery("SO1", false, 10.0),
            delivery("SO1", false, 10.0),
        ];
        let refs: Vec<&DeliveryOrder> = all.iter().collect();
        assert_eq!(classify_shipment(&refs), ShipmentStatus::None);

        let one = vec![
            delivery("SO1", true, 10.0),
            delivery("SO1", false, 10.0),
            delivery("SO1", false, 10.0),
        ];
        let refs: Vec<&DeliveryOrder> = one.iter().collect();
        assert_eq!(classify_shipment(&refs), ShipmentStatus::Partial);

        let every = vec![
            delivery("SO1", true, 10.0),
            delivery("SO1", true, 10.0),
            delivery("SO1", true, 10.0),
        ];
        let refs: Vec<&DeliveryOrder> = every.iter().collect();
        assert_eq!(classify_shipment(&refs), ShipmentStatus::Full);
    }

    #[test]
    fn no_matches_classifies_as_none() {
        assert_eq!(classify_shipment(&[]), ShipmentStatus::None);
    }

    #[test]
    fn shipped_rate_is_clamped_to_one() {
        let matches = vec![delivery("SO1", true, 150.0)];
        let refs: Vec<&DeliveryOrder> = matches.iter().collect();
        assert_eq!(shipped_rate(100.0, &refs), 1.0);
    }

    #[test]
    fn zero_or_negative_order_amount_yields_zero_rate() {
        let matches = vec![delivery("SO1", true, 50.0)];
        let refs: Vec<&DeliveryOrder> = matches.iter().collect();
        assert_eq!(shipped_rate(0.0, &refs), 0.0);
        assert_eq!(shipped_rate(-10.0, &refs), 0.0);
    }

    #[test]
    fn unshipped_matches_contribute_nothing_to_rate() {
        let matches = vec![delivery("SO1", true, 40.0), delivery("SO1", false, 60.0)];
        let refs: Vec<&DeliveryOrder> = matches.iter().collect();
        assert_eq!(shipped_rate(100.0, &refs), 0.4);
    }

    #[test]
    fn attachment_normalization_discards_fragment_and_joins_base() {
        let url = normalize_attachment(
            "35/abc/file.pdf#size=1024&name=x.pdf",
            "https://x/files",
            "T1",
        );
        assert_eq!(url, "https://x/files/T1/35/abc/file.pdf");
    }

    #[test]
    fn attachment_without_fragment_is_prefixed_unchanged() {
        let url = normalize_attachment("a/b.png", "https://x/files/", "T1");
        assert_eq!(url, "https://x/files/T1/a/b.png");
    }
}
