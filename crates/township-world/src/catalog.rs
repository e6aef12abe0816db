//! Static catalog of purchasable assets.
//!
//! | Key           | Cost | Yield                          |
//! |---------------|------|--------------------------------|
//! | `pocket-rig`  | 250  | 10 H, 0.5 power per block      |
//! | `tower-rig`   | 900  | 45 H, 2 power per block        |
//! | `quantum-rig` | 3000 | 180 H, 7.5 power per block     |
//! | `studio`      | 800  | 48 rent per day                |
//! | `townhouse`   | 2500 | 150 rent per day               |
//! | `tower-loft`  | 6000 | 380 rent per day               |

use rust_decimal::Decimal;
use serde::Serialize;

/// A purchasable mining machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MachineSpec {
    /// Catalog key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Purchase price.
    pub cost: Decimal,
    /// Hash rate contributed while running.
    pub hash_rate: f64,
    /// Power cost charged per block reward share.
    pub power_cost: Decimal,
}

/// A purchasable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertySpec {
    /// Catalog key.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Purchase price and starting value.
    pub cost: Decimal,
    /// Rental income per day.
    pub rental_income: Decimal,
}

/// Every mining machine on sale, cheapest first.
pub const MACHINES: [MachineSpec; 3] = [
    MachineSpec {
        key: "pocket-rig",
        name: "Pocket Rig",
        cost: Decimal::from_parts(250, 0, 0, false, 0),
        hash_rate: 10.0,
        power_cost: Decimal::from_parts(5, 0, 0, false, 1),
    },
    MachineSpec {
        key: "tower-rig",
        name: "Tower Rig",
        cost: Decimal::from_parts(900, 0, 0, false, 0),
        hash_rate: 45.0,
        power_cost: Decimal::from_parts(2, 0, 0, false, 0),
    },
    MachineSpec {
        key: "quantum-rig",
        name: "Quantum Rig",
        cost: Decimal::from_parts(3000, 0, 0, false, 0),
        hash_rate: 180.0,
        power_cost: Decimal::from_parts(75, 0, 0, false, 1),
    },
];

/// Every property on sale, cheapest first.
pub const PROPERTIES: [PropertySpec; 3] = [
    PropertySpec {
        key: "studio",
        name: "Studio",
        cost: Decimal::from_parts(800, 0, 0, false, 0),
        rental_income: Decimal::from_parts(48, 0, 0, false, 0),
    },
    PropertySpec {
        key: "townhouse",
        name: "Townhouse",
        cost: Decimal::from_parts(2500, 0, 0, false, 0),
        rental_income: Decimal::from_parts(150, 0, 0, false, 0),
    },
    PropertySpec {
        key: "tower-loft",
        name: "Tower Loft",
        cost: Decimal::from_parts(6000, 0, 0, false, 0),
        rental_income: Decimal::from_parts(380, 0, 0, false, 0),
    },
];

/// Look up a machine by catalog key.
pub fn find_machine(key: &str) -> Option<&'static MachineSpec> {
    MACHINES.iter().find(|spec| spec.key == key)
}

/// Look up a property by catalog key.
pub fn find_property(key: &str) -> Option<&'static PropertySpec> {
    PROPERTIES.iter().find(|spec| spec.key == key)
}

/// Any catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogItem {
    /// A mining machine.
    Machine(&'static MachineSpec),
    /// A property.
    Property(&'static PropertySpec),
}

impl CatalogItem {
    /// Purchase price.
    pub const fn cost(self) -> Decimal {
        match self {
            Self::Machine(spec) => spec.cost,
            Self::Property(spec) => spec.cost,
        }
    }

    /// Catalog key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Machine(spec) => spec.key,
            Self::Property(spec) => spec.key,
        }
    }
}

/// The most expensive entry costing no more than `budget`.
///
/// Ties keep the first entry found, machines before properties.
pub fn most_expensive_affordable(budget: Decimal) -> Option<CatalogItem> {
    MACHINES
        .iter()
        .map(CatalogItem::Machine)
        .chain(PROPERTIES.iter().map(CatalogItem::Property))
        .filter(|item| item.cost() <= budget)
        .fold(None, |best: Option<CatalogItem>, item| match best {
            Some(current) if current.cost() >= item.cost() => Some(current),
            _ => Some(item),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn catalog_prices_match_table() {
        assert_eq!(find_machine("pocket-rig").map(|s| s.cost), Some(dec!(250)));
        assert_eq!(find_machine("quantum-rig").map(|s| s.power_cost), Some(dec!(7.5)));
        assert_eq!(find_property("tower-loft").map(|s| s.rental_income), Some(dec!(380)));
    }

    #[test]
    fn unknown_keys_miss() {
        assert!(find_machine("abacus").is_none());
        assert!(find_property("castle").is_none());
    }

    #[test]
    fn picks_most_expensive_within_budget() {
        let pick = most_expensive_affordable(dec!(2600));
        assert_eq!(pick.map(CatalogItem::key), Some("townhouse"));

        let pick = most_expensive_affordable(dec!(3000));
        assert_eq!(pick.map(CatalogItem::key), Some("quantum-rig"));

        assert!(most_expensive_affordable(dec!(100)).is_none());
    }
}
