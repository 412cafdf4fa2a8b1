use std::fmt;

/// Closed set of columns of the `applications` table.
///
/// Column names only ever reach SQL text through this enum, so nothing the
/// caller supplies can be interpolated as an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Company,
    Role,
    Url,
    SalaryMin,
    SalaryMax,
    Location,
    Status,
    Notes,
    AppliedAt,
    CreatedAt,
    UpdatedAt,
    CompanyKey,
    RoleKey,
    LocationKey,
}

impl Column {
    /// Every record column in table order, as selected by record reads.
    pub const ALL: [Column; 12] = [
        Column::Id,
        Column::Company,
        Column::Role,
        Column::Url,
        Column::SalaryMin,
        Column::SalaryMax,
        Column::Location,
        Column::Status,
        Column::Notes,
        Column::AppliedAt,
        Column::CreatedAt,
        Column::UpdatedAt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Company => "company",
            Column::Role => "role",
            Column::Url => "url",
            Column::SalaryMin => "salary_min",
            Column::SalaryMax => "salary_max",
            Column::Location => "location",
            Column::Status => "status",
            Column::Notes => "notes",
            Column::AppliedAt => "applied_at",
            Column::CreatedAt => "created_at",
            Column::UpdatedAt => "updated_at",
            Column::CompanyKey => "company_key",
            Column::RoleKey => "role_key",
            Column::LocationKey => "location_key",
        }
    }

    /// The case-folded shadow column kept alongside a searchable text
    /// column. Shadow columns are written on every insert and update and are
    /// never part of [`Column::ALL`].
    pub fn search_key(&self) -> Option<Column> {
        match self {
            Column::Company => Some(Column::CompanyKey),
            Column::Role => Some(Column::RoleKey),
            Column::Location => Some(Column::LocationKey),
            _ => None,
        }
    }

    /// `id, company, ..., updated_at`
    pub fn select_list() -> String {
        Self::ALL
            .iter()
            .map(Column::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
