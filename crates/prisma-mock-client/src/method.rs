use std::fmt;

use serde::{Deserialize, Serialize};

/// Operation kinds a Prisma client can execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrismaMethod {
    Create,
    CreateMany,
    FindUnique,
    FindUniqueOrRaise,
    FindFirst,
    FindFirstOrRaise,
    FindMany,
    Update,
    UpdateMany,
    Upsert,
    Delete,
    DeleteMany,
    Count,
    GroupBy,
    QueryRaw,
    QueryFirst,
    ExecuteRaw,
}

impl PrismaMethod {
    pub const ALL: [PrismaMethod; 17] = [
        PrismaMethod::Create,
        PrismaMethod::CreateMany,
        PrismaMethod::FindUnique,
        PrismaMethod::FindUniqueOrRaise,
        PrismaMethod::FindFirst,
        PrismaMethod::FindFirstOrRaise,
        PrismaMethod::FindMany,
        PrismaMethod::Update,
        PrismaMethod::UpdateMany,
        PrismaMethod::Upsert,
        PrismaMethod::Delete,
        PrismaMethod::DeleteMany,
        PrismaMethod::Count,
        PrismaMethod::GroupBy,
        PrismaMethod::QueryRaw,
        PrismaMethod::QueryFirst,
        PrismaMethod::ExecuteRaw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrismaMethod::Create => "create",
            PrismaMethod::CreateMany => "create_many",
            PrismaMethod::FindUnique => "find_unique",
            PrismaMethod::FindUniqueOrRaise => "find_unique_or_raise",
            PrismaMethod::FindFirst => "find_first",
            PrismaMethod::FindFirstOrRaise => "find_first_or_raise",
            PrismaMethod::FindMany => "find_many",
            PrismaMethod::Update => "update",
            PrismaMethod::UpdateMany => "update_many",
            PrismaMethod::Upsert => "upsert",
            PrismaMethod::Delete => "delete",
            PrismaMethod::DeleteMany => "delete_many",
            PrismaMethod::Count => "count",
            PrismaMethod::GroupBy => "group_by",
            PrismaMethod::QueryRaw => "query_raw",
            PrismaMethod::QueryFirst => "query_first",
            PrismaMethod::ExecuteRaw => "execute_raw",
        }
    }
}

impl fmt::Display for PrismaMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
