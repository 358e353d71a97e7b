// ---------------------------------------------------------------------------
// Column definitions shared by the loader and the "Definitions" page
// ---------------------------------------------------------------------------

/// Logical type of a catalog column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Float,
    Integer,
}

/// One documented column of the wine schema.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
    pub description: &'static str,
}

pub const COUNTRY: &str = "country";
pub const DESCRIPTION: &str = "description";
pub const DESIGNATION: &str = "designation";
pub const POINTS: &str = "points";
pub const PRICE: &str = "price";
pub const PROVINCE: &str = "province";
pub const REGION_1: &str = "region_1";
pub const REGION_2: &str = "region_2";
pub const TASTER_NAME: &str = "taster_name";
pub const TASTER_TWITTER_HANDLE: &str = "taster_twitter_handle";
pub const TITLE: &str = "title";
pub const VARIETY: &str = "variety";
pub const WINERY: &str = "winery";

/// The schema in display order.
pub const COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: COUNTRY,
        kind: ColumnKind::Text,
        required: true,
        description: "Country the wine comes from.",
    },
    ColumnDef {
        name: DESCRIPTION,
        kind: ColumnKind::Text,
        required: false,
        description: "Tasting notes: aromas, flavours and character of the wine.",
    },
    ColumnDef {
        name: DESIGNATION,
        kind: ColumnKind::Text,
        required: true,
        description: "Vineyard or special cuvée the wine is made from.",
    },
    ColumnDef {
        name: POINTS,
        kind: ColumnKind::Integer,
        required: true,
        description: "Score given to the wine, on a 0 to 100 scale.",
    },
    ColumnDef {
        name: PRICE,
        kind: ColumnKind::Float,
        required: true,
        description: "Price of a bottle.",
    },
    ColumnDef {
        name: PROVINCE,
        kind: ColumnKind::Text,
        required: true,
        description: "Province or main region where the wine is produced.",
    },
    ColumnDef {
        name: REGION_1,
        kind: ColumnKind::Text,
        required: true,
        description: "More specific growing area inside the province.",
    },
    ColumnDef {
        name: REGION_2,
        kind: ColumnKind::Text,
        required: true,
        description: "Sub-region inside region_1, when there is one.",
    },
    ColumnDef {
        name: TASTER_NAME,
        kind: ColumnKind::Text,
        required: true,
        description: "Name of the expert who tasted and rated the wine.",
    },
    ColumnDef {
        name: TASTER_TWITTER_HANDLE,
        kind: ColumnKind::Text,
        required: true,
        description: "Twitter handle of the taster.",
    },
    ColumnDef {
        name: TITLE,
        kind: ColumnKind::Text,
        required: true,
        description: "Full name of the wine, usually including the vintage year and region.",
    },
    ColumnDef {
        name: VARIETY,
        kind: ColumnKind::Text,
        required: true,
        description: "Grape variety or blend used to make the wine.",
    },
    ColumnDef {
        name: WINERY,
        kind: ColumnKind::Text,
        required: true,
        description: "Producer: château or wine estate.",
    },
];

/// Columns every input file must provide.
pub fn required_columns() -> impl Iterator<Item = &'static ColumnDef> {
    COLUMNS.iter().filter(|c| c.required)
}

/// Return the first required column absent from `present`, if any.
pub fn first_missing<'a, I>(present: I) -> Option<&'static str>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    required_columns()
        .map(|c| c.name)
        .find(|name| !present.clone().into_iter().any(|p| p == *name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_the_only_optional_column() {
        let optional: Vec<_> = COLUMNS
            .iter()
            .filter(|c| !c.required)
            .map(|c| c.name)
            .collect();
        assert_eq!(optional, vec![DESCRIPTION]);
        assert_eq!(required_columns().count(), 12);
    }

    #[test]
    fn first_missing_reports_absent_required_column() {
        let mut present: Vec<&str> = required_columns().map(|c| c.name).collect();
        assert_eq!(first_missing(present.iter().copied()), None);

        present.retain(|c| *c != WINERY);
        assert_eq!(first_missing(present.iter().copied()), Some(WINERY));
    }
}
