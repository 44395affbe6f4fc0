//! [`Totals`] definitions.

use common::{money::Currency, Money, Percent};

use super::Item;
#[cfg(doc)]
use super::Quote;

/// Cached money totals of a [`Quote`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Totals {
    /// Sum of the service [`Item`]s.
    pub services: Money,

    /// Sum of the material [`Item`]s.
    pub materials: Money,

    /// Sum of the labor [`Item`]s.
    pub labor: Money,

    /// Sum of every [`Item`] plus the travel expenses.
    pub net: Money,

    /// Value-added tax on the [`Totals::net`] value.
    pub vat: Money,

    /// Final amount to pay: [`Totals::net`] plus [`Totals::vat`].
    pub total: Money,
}

impl Totals {
    /// Creates zero [`Totals`] in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        let zero = Money::zero(currency);
        Self {
            services: zero,
            materials: zero,
            labor: zero,
            net: zero,
            vat: zero,
            total: zero,
        }
    }

    /// Computes [`Totals`] of the provided `items` along with the
    /// `travel_expenses`, taxed by the `vat_rate`.
    ///
    /// [`None`] is returned if any amount is not in the [`Currency`] of the
    /// `travel_expenses`, or on overflow.
    #[must_use]
    pub fn compute<'i>(
        items: impl IntoIterator<Item = &'i Item>,
        travel_expenses: Money,
        vat_rate: Percent,
    ) -> Option<Self> {
        use super::item::Kind;

        let mut totals = Self::zero(travel_expenses.currency);
        for item in items {
            let sum = match item.kind() {
                Kind::Service => &mut totals.services,
                Kind::Material => &mut totals.materials,
                Kind::Labor => &mut totals.labor,
            };
            *sum = sum.checked_add(item.subtotal()?)?;
        }

        totals.net = totals
            .services
            .checked_add(totals.materials)?
            .checked_add(totals.labor)?
            .checked_add(travel_expenses)?
            .round();
        totals.vat =
            Money::new(vat_rate.of(totals.net.amount)?, totals.net.currency)
                .round();
        totals.total = totals.net.checked_add(totals.vat)?;

        Some(totals)
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money, Percent};

    use crate::domain::quote::{
        self,
        item::{self, Description, Line},
        Item,
    };

    use super::Totals;

    fn clp(s: &str) -> Money {
        Money::new(s.parse().unwrap(), Currency::Clp)
    }

    fn vat() -> Percent {
        "19".parse().unwrap()
    }

    fn item(line: Line) -> Item {
        Item {
            id: item::Id::new(),
            quote_id: quote::Id::new(),
            position: item::Position::default(),
            line,
        }
    }

    fn service(qty: &str, price: &str) -> Item {
        item(Line::Service {
            description: Description::new("Instalación").unwrap(),
            quantity: qty.parse().unwrap(),
            unit_price: clp(price),
        })
    }

    fn labor(hours: &str, rate: &str) -> Item {
        item(Line::Labor {
            description: Description::new("Técnico").unwrap(),
            hours: hours.parse().unwrap(),
            hourly_rate: clp(rate),
        })
    }

    fn material(qty: &str, price: &str) -> Item {
        item(Line::Material {
            material_id: None,
            description: Description::new("Cable 2.5mm").unwrap(),
            quantity: qty.parse().unwrap(),
            unit_price: clp(price),
            usage_hours: "0".parse().unwrap(),
        })
    }

    #[test]
    fn sums_items_by_kind() {
        let items = [
            service("2", "50000"),
            material("10", "1200"),
            material("1", "800"),
            labor("4", "15000"),
        ];

        let totals = Totals::compute(&items, clp("20000"), vat()).unwrap();

        assert_eq!(totals.services, clp("100000"));
        assert_eq!(totals.materials, clp("12800"));
        assert_eq!(totals.labor, clp("60000"));
        assert_eq!(totals.net, clp("192800"));
        assert_eq!(totals.vat, clp("36632"));
        assert_eq!(totals.total, clp("229432"));
    }

    #[test]
    fn rounds_vat_to_cents() {
        let items = [service("1", "10.01")];

        let totals = Totals::compute(&items, clp("0"), vat()).unwrap();

        assert_eq!(totals.vat, clp("1.90"));
        assert_eq!(totals.total, clp("11.91"));
    }

    #[test]
    fn taxes_travel_expenses_without_items() {
        let totals = Totals::compute([], clp("1000"), vat()).unwrap();

        assert_eq!(totals.net, clp("1000"));
        assert_eq!(totals.vat, clp("190"));
        assert_eq!(totals.total, clp("1190"));
    }

    #[test]
    fn overflow_is_none() {
        let items = [service("2", "1")];
        let travel = Money::new(rust_decimal::Decimal::MAX, Currency::Clp);

        assert_eq!(Totals::compute(&items, travel, vat()), None);
    }

    #[test]
    fn rejects_mixed_currencies() {
        let items = [service("1", "100")];
        let travel = Money::new("5".parse().unwrap(), Currency::Usd);

        assert_eq!(Totals::compute(&items, travel, vat()), None);
    }
}
