use std::collections::HashMap;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{BracketTable, Province, TaxBracket};

/// Tax year the built-in tables describe.
pub const TAX_YEAR: i32 = 2025;

const FEDERAL: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.15)),
    (dec!(57375), dec!(0.205)),
    (dec!(114750), dec!(0.26)),
    (dec!(158468), dec!(0.29)),
    (dec!(220000), dec!(0.33)),
];

const ONTARIO: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.0505)),
    (dec!(51446), dec!(0.0915)),
    (dec!(102894), dec!(0.1116)),
    (dec!(150000), dec!(0.1216)),
    (dec!(220000), dec!(0.1316)),
];

const BRITISH_COLUMBIA: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.0506)),
    (dec!(47937), dec!(0.077)),
    (dec!(95875), dec!(0.105)),
    (dec!(110076), dec!(0.1229)),
    (dec!(133664), dec!(0.147)),
    (dec!(181232), dec!(0.168)),
    (dec!(252752), dec!(0.205)),
];

const ALBERTA: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.10)),
    (dec!(148269), dec!(0.12)),
    (dec!(177922), dec!(0.13)),
    (dec!(237230), dec!(0.14)),
    (dec!(355845), dec!(0.15)),
];

const QUEBEC: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.14)),
    (dec!(51780), dec!(0.19)),
    (dec!(103545), dec!(0.24)),
    (dec!(126000), dec!(0.2575)),
];

const MANITOBA: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.108)),
    (dec!(47000), dec!(0.1275)),
    (dec!(100000), dec!(0.174)),
];

const SASKATCHEWAN: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.105)),
    (dec!(52057), dec!(0.125)),
    (dec!(148734), dec!(0.145)),
];

const NOVA_SCOTIA: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.0879)),
    (dec!(29590), dec!(0.1495)),
    (dec!(59180), dec!(0.1667)),
    (dec!(93000), dec!(0.175)),
    (dec!(150000), dec!(0.21)),
];

const NEW_BRUNSWICK: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.094)),
    (dec!(49958), dec!(0.14)),
    (dec!(99916), dec!(0.16)),
    (dec!(185064), dec!(0.195)),
];

const NEWFOUNDLAND_AND_LABRADOR: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.087)),
    (dec!(43198), dec!(0.145)),
    (dec!(86395), dec!(0.158)),
    (dec!(154244), dec!(0.178)),
    (dec!(215943), dec!(0.198)),
    (dec!(275870), dec!(0.208)),
    (dec!(551739), dec!(0.213)),
    (dec!(1103478), dec!(0.218)),
];

const PRINCE_EDWARD_ISLAND: &[(Decimal, Decimal)] = &[
    (dec!(0), dec!(0.098)),
    (dec!(32656), dec!(0.138)),
    (dec!(64313), dec!(0.167)),
];

/// Expands `(lower_bound, rate)` pairs into a table whose upper bounds are
/// the next bracket's lower bound.
fn build(thresholds: &[(Decimal, Decimal)]) -> BracketTable {
    let brackets = thresholds
        .iter()
        .enumerate()
        .map(|(i, &(lower, rate))| {
            let upper = thresholds.get(i + 1).map(|&(next, _)| next);
            TaxBracket::new(lower, upper, rate)
        })
        .collect();

    match BracketTable::new(brackets) {
        Ok(table) => table,
        Err(e) => panic!("built-in bracket table is malformed: {e}"),
    }
}

fn provincial_thresholds(province: Province) -> &'static [(Decimal, Decimal)] {
    match province {
        Province::Ontario => ONTARIO,
        Province::BritishColumbia => BRITISH_COLUMBIA,
        Province::Alberta => ALBERTA,
        Province::Quebec => QUEBEC,
        Province::Manitoba => MANITOBA,
        Province::Saskatchewan => SASKATCHEWAN,
        Province::NovaScotia => NOVA_SCOTIA,
        Province::NewBrunswick => NEW_BRUNSWICK,
        Province::NewfoundlandAndLabrador => NEWFOUNDLAND_AND_LABRADOR,
        Province::PrinceEdwardIsland => PRINCE_EDWARD_ISLAND,
    }
}

static FEDERAL_TABLE: OnceLock<BracketTable> = OnceLock::new();
static PROVINCIAL_TABLES: OnceLock<HashMap<Province, BracketTable>> = OnceLock::new();

/// The 2025 federal bracket table.
pub fn federal_brackets() -> &'static BracketTable {
    FEDERAL_TABLE.get_or_init(|| build(FEDERAL))
}

/// The 2025 bracket table for `province`.
pub fn provincial_brackets(province: Province) -> &'static BracketTable {
    let tables = PROVINCIAL_TABLES.get_or_init(|| {
        Province::all()
            .iter()
            .map(|&p| (p, build(provincial_thresholds(p))))
            .collect()
    });
    // Every province is inserted above.
    &tables[&province]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn federal_table_has_five_brackets() {
        let table = federal_brackets();

        assert_eq!(table.len(), 5);
        assert_eq!(table.brackets()[0].upper_bound, Some(dec!(57375)));
        assert_eq!(table.brackets()[4].upper_bound, None);
        assert_eq!(table.brackets()[4].rate, dec!(0.33));
    }

    #[test]
    fn every_province_has_a_table() {
        for province in Province::all() {
            let table = provincial_brackets(*province);

            assert!(!table.is_empty(), "{province} has no brackets");
            assert_eq!(table.brackets()[0].lower_bound, dec!(0));
        }
    }

    #[test]
    fn built_in_tables_are_progressive() {
        let tables = Province::all()
            .iter()
            .map(|p| provincial_brackets(*p))
            .chain(std::iter::once(federal_brackets()));

        for table in tables {
            let rates: Vec<_> = table.brackets().iter().map(|b| b.rate).collect();
            assert!(rates.windows(2).all(|w| w[0] <= w[1]), "{rates:?}");
        }
    }

    #[test]
    fn newfoundland_has_eight_brackets() {
        let table = provincial_brackets(Province::NewfoundlandAndLabrador);

        assert_eq!(table.len(), 8);
        assert_eq!(table.brackets()[7].lower_bound, dec!(1103478));
    }

    #[test]
    fn tables_are_initialised_once() {
        let first = federal_brackets() as *const BracketTable;
        let second = federal_brackets() as *const BracketTable;

        assert_eq!(first, second);
    }
}
