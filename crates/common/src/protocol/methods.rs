// Method name constants — derived from contracts/methods.json.

// ── Global ─────────────────────────────────────────────────────────
pub const GET_VAULT_INFO: &str = "getvaultinfo";

// ── Keychain ───────────────────────────────────────────────────────
pub const GET_KEYCHAINS: &str = "getkeychains";
pub const GET_KEYCHAIN_INFO: &str = "getkeychaininfo";
pub const NEW_KEYCHAIN: &str = "newkeychain";
pub const RENAME_KEYCHAIN: &str = "renamekeychain";

// ── Account ────────────────────────────────────────────────────────
pub const GET_ACCOUNTS: &str = "getaccounts";
pub const GET_ACCOUNT_INFO: &str = "getaccountinfo";

// ── Blockchain ─────────────────────────────────────────────────────
pub const GET_CHAIN_TIP: &str = "getchaintip";
pub const GET_BLOCK_HEADER: &str = "getblockheader";

/// One entry in the request catalog: a method name and the ordered
/// parameter fields it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub method: &'static str,
    pub params: &'static [&'static str],
}

/// The full request catalog in display order. `getblockheader` appears
/// twice, once per variant: integer height and hash string.
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry { method: GET_VAULT_INFO, params: &[] },
    CatalogEntry { method: GET_KEYCHAINS, params: &[] },
    CatalogEntry { method: GET_KEYCHAIN_INFO, params: &["name"] },
    CatalogEntry { method: NEW_KEYCHAIN, params: &["name"] },
    CatalogEntry { method: RENAME_KEYCHAIN, params: &["oldname", "newname"] },
    CatalogEntry { method: GET_ACCOUNTS, params: &[] },
    CatalogEntry { method: GET_ACCOUNT_INFO, params: &["name"] },
    CatalogEntry { method: GET_CHAIN_TIP, params: &[] },
    CatalogEntry { method: GET_BLOCK_HEADER, params: &["height"] },
    CatalogEntry { method: GET_BLOCK_HEADER, params: &["hash"] },
];
