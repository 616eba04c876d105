//! Line item store: one ordered list of line items per taxonomy section

use rust_decimal::Decimal;

use crate::models::{clamp_amount, LineItem, LineItemId, LineItemPatch};
use crate::types::SectionKey;

/// Mutable collection of line items partitioned into sections.
///
/// Every item lives in exactly one section and ids are unique across the
/// store. Each mutating call bumps [`LineItemStore::revision`], which is how
/// callers tell whether a computed result is stale.
#[derive(Debug, Clone, Default)]
pub struct LineItemStore {
    sections: [Vec<LineItem>; SectionKey::COUNT],
    pub(crate) revision: u64,
}

impl PartialEq for LineItemStore {
    /// Stores are equal when they hold the same items in the same sections
    /// and order; the revision counter is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.sections == other.sections
    }
}

impl LineItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutation counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn bounded(amount: Decimal) -> Decimal {
        let clamped = clamp_amount(amount);
        if clamped != amount {
            log::warn!("amount {} out of range, clamped to {}", amount, clamped);
        }
        clamped
    }

    fn locate(&self, id: &LineItemId) -> Option<(SectionKey, usize)> {
        SectionKey::ALL.iter().find_map(|key| {
            self.sections[key.index()]
                .iter()
                .position(|item| item.id == *id)
                .map(|pos| (*key, pos))
        })
    }

    /// Append a new line item with a freshly generated id
    pub fn add(&mut self, section: SectionKey, name: impl Into<String>, amount: Decimal) -> LineItemId {
        let item = LineItem::new(name, Self::bounded(amount));
        let id = item.id.clone();
        log::debug!("add {} to {}", id, section);
        self.sections[section.index()].push(item);
        self.touch();
        id
    }

    /// Append an existing line item, keeping its id unless it is already taken.
    ///
    /// Returns the id the item ended up with.
    pub fn push_item(&mut self, section: SectionKey, mut item: LineItem) -> LineItemId {
        item.amount = Self::bounded(item.amount);
        if self.contains(&item.id) {
            let fresh = LineItemId::generate();
            log::warn!("duplicate line item id {} in {}, assigned {}", item.id, section, fresh);
            item.id = fresh;
        }
        let id = item.id.clone();
        self.sections[section.index()].push(item);
        self.touch();
        id
    }

    /// Remove a line item from whichever section holds it.
    ///
    /// Unknown ids are a no-op and return `None`.
    pub fn remove(&mut self, id: &LineItemId) -> Option<LineItem> {
        self.touch();
        let (section, pos) = self.locate(id)?;
        log::debug!("remove {} from {}", id, section);
        Some(self.sections[section.index()].remove(pos))
    }

    /// Update a line item in place; returns whether a field changed
    pub fn update(&mut self, id: &LineItemId, patch: &LineItemPatch) -> bool {
        self.touch();
        match self.locate(id) {
            Some((section, pos)) => {
                let item = &mut self.sections[section.index()][pos];
                let changed = patch.apply(item);
                item.amount = Self::bounded(item.amount);
                changed
            }
            None => false,
        }
    }

    /// Move a line item to the end of another section, keeping its id
    pub fn move_to(&mut self, id: &LineItemId, target: SectionKey) -> bool {
        self.touch();
        let Some((section, pos)) = self.locate(id) else {
            return false;
        };
        if section == target {
            return false;
        }
        let item = self.sections[section.index()].remove(pos);
        log::debug!("move {} from {} to {}", id, section, target);
        self.sections[target.index()].push(item);
        true
    }

    /// Remove every line item
    pub fn clear(&mut self) {
        for section in self.sections.iter_mut() {
            section.clear();
        }
        self.touch();
    }

    pub fn contains(&self, id: &LineItemId) -> bool {
        self.locate(id).is_some()
    }

    pub fn get(&self, id: &LineItemId) -> Option<&LineItem> {
        self.locate(id)
            .map(|(section, pos)| &self.sections[section.index()][pos])
    }

    /// Section currently holding the item
    pub fn section_of(&self, id: &LineItemId) -> Option<SectionKey> {
        self.locate(id).map(|(section, _)| section)
    }

    /// Borrow the items of a section in insertion order
    pub fn section(&self, section: SectionKey) -> &[LineItem] {
        &self.sections[section.index()]
    }

    /// Owned copy of a section; changing it does not affect the store
    pub fn list_section(&self, section: SectionKey) -> Vec<LineItem> {
        self.sections[section.index()].clone()
    }

    /// All items with their section, in canonical section order
    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &LineItem)> + '_ {
        SectionKey::ALL
            .into_iter()
            .flat_map(move |key| self.sections[key.index()].iter().map(move |item| (key, item)))
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MAX_AMOUNT;
    use rust_decimal_macros::dec;

    #[test]
    fn test_add_and_list() {
        let mut store = LineItemStore::new();
        let caja = store.add(SectionKey::AssetsCurrent, "Caja", dec!(1000));
        let bancos = store.add(SectionKey::AssetsCurrent, "Bancos", dec!(2000));

        let items = store.list_section(SectionKey::AssetsCurrent);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, caja);
        assert_eq!(items[1].id, bancos);
        assert!(store.list_section(SectionKey::EquityMain).is_empty());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_list_section_is_a_copy() {
        let mut store = LineItemStore::new();
        store.add(SectionKey::EquityMain, "Capital", dec!(500));

        let mut copy = store.list_section(SectionKey::EquityMain);
        copy[0].amount = dec!(1);
        copy.clear();

        assert_eq!(store.section(SectionKey::EquityMain)[0].amount, dec!(500));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut store = LineItemStore::new();
        store.add(SectionKey::IncomeRevenues, "Ventas", dec!(10));
        let before = store.clone();

        assert!(store.remove(&LineItemId::from("missing")).is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn test_remove_from_any_section() {
        let mut store = LineItemStore::new();
        let id = store.add(SectionKey::LiabilitiesCurrent, "Proveedores", dec!(1500));
        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.name, "Proveedores");
        assert!(store.is_empty());
    }

    #[test]
    fn test_update() {
        let mut store = LineItemStore::new();
        let id = store.add(SectionKey::IncomeExpenses, "Renta", dec!(1000));

        assert!(store.update(&id, &LineItemPatch::amount(dec!(1200))));
        assert_eq!(store.get(&id).unwrap().amount, dec!(1200));
        assert!(!store.update(&LineItemId::from("nope"), &LineItemPatch::name("x")));
    }

    #[test]
    fn test_revision_bumps_on_every_mutation() {
        let mut store = LineItemStore::new();
        let r0 = store.revision();
        let id = store.add(SectionKey::EquityMain, "Capital", dec!(1));
        let r1 = store.revision();
        assert!(r1 > r0);

        store.update(&id, &LineItemPatch::amount(dec!(2)));
        let r2 = store.revision();
        assert!(r2 > r1);

        store.remove(&LineItemId::from("unknown"));
        assert!(store.revision() > r2);
    }

    #[test]
    fn test_push_item_regenerates_duplicate_ids() {
        let mut store = LineItemStore::new();
        let first = store.push_item(
            SectionKey::AssetsCurrent,
            LineItem::with_id("dup".into(), "Caja", dec!(1)),
        );
        let second = store.push_item(
            SectionKey::AssetsNonCurrent,
            LineItem::with_id("dup".into(), "Terreno", dec!(2)),
        );

        assert_eq!(first.as_str(), "dup");
        assert_ne!(second, first);
        assert_eq!(store.section_of(&first), Some(SectionKey::AssetsCurrent));
        assert_eq!(store.section_of(&second), Some(SectionKey::AssetsNonCurrent));
    }

    #[test]
    fn test_move_keeps_single_membership() {
        let mut store = LineItemStore::new();
        let id = store.add(SectionKey::LiabilitiesCurrent, "Préstamo", dec!(300));

        assert!(store.move_to(&id, SectionKey::LiabilitiesNonCurrent));
        assert!(store.section(SectionKey::LiabilitiesCurrent).is_empty());
        assert_eq!(store.section_of(&id), Some(SectionKey::LiabilitiesNonCurrent));
        assert_eq!(store.len(), 1);

        assert!(!store.move_to(&id, SectionKey::LiabilitiesNonCurrent));
    }

    #[test]
    fn test_iter_visits_every_item_once() {
        let mut store = LineItemStore::new();
        store.add(SectionKey::AssetsCurrent, "a", dec!(1));
        store.add(SectionKey::CashFlowPayroll, "b", dec!(2));
        store.add(SectionKey::AssetsCurrent, "c", dec!(3));

        let seen: Vec<_> = store.iter().map(|(k, i)| (k, i.name.as_str())).collect();
        assert_eq!(
            seen,
            vec![
                (SectionKey::AssetsCurrent, "a"),
                (SectionKey::AssetsCurrent, "c"),
                (SectionKey::CashFlowPayroll, "b"),
            ]
        );
    }

    #[test]
    fn test_amounts_are_clamped() {
        let mut store = LineItemStore::new();
        let big = store.add(SectionKey::AssetsCurrent, "a", Decimal::MAX);
        let small = store.push_item(
            SectionKey::AssetsCurrent,
            LineItem::with_id("b".into(), "b", Decimal::MIN),
        );
        assert_eq!(store.get(&big).unwrap().amount, MAX_AMOUNT);
        assert_eq!(store.get(&small).unwrap().amount, -MAX_AMOUNT);

        store.update(&small, &LineItemPatch::amount(Decimal::MAX));
        assert_eq!(store.get(&small).unwrap().amount, MAX_AMOUNT);
    }

    #[test]
    fn test_clear() {
        let mut store = LineItemStore::new();
        store.add(SectionKey::AssetsCurrent, "a", dec!(1));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
    }
}
