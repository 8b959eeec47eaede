//! In-memory document store.
//!
//! One `DashMap` per collection. Conditional updates run under the entry
//! lock of the target document, which is what gives `replace_account` and
//! `transfer_cas_status` their atomicity.

use crate::error::{StoreError, StoreResult};
use crate::page::{Page, PageQuery, SortDir};
use coinhub_core::{
    Account, AccountId, BankLink, BankLinkId, CoinId, CoinOrder, CoinSymbol, ListedCoin, OrderId,
    OrderSide, PlanId, RatePlan, Role, Saving, SavingId, SavingStatus, Transfer, TransferId,
    TransferKind, TransferStatus,
};
use dashmap::DashMap;

// ============================================================================
// Filters
// ============================================================================

/// Filter for order queries.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub account_id: Option<AccountId>,
    pub symbol: Option<CoinSymbol>,
    pub side: Option<OrderSide>,
}

/// Filter for transfer queries.
#[derive(Debug, Clone, Default)]
pub struct TransferFilter {
    pub account_id: Option<AccountId>,
    pub kind: Option<TransferKind>,
    pub status: Option<TransferStatus>,
}

/// Filter for saving queries.
#[derive(Debug, Clone, Default)]
pub struct SavingFilter {
    pub account_id: Option<AccountId>,
    pub status: Option<SavingStatus>,
}

/// Filter for account queries.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    pub role: Option<Role>,
}

/// Filter for coin listing queries.
#[derive(Debug, Clone, Default)]
pub struct CoinFilter {
    pub symbol: Option<CoinSymbol>,
    pub is_active: Option<bool>,
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory document store over all coinhub collections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: DashMap<AccountId, Account>,
    coins: DashMap<CoinId, ListedCoin>,
    orders: DashMap<OrderId, CoinOrder>,
    transfers: DashMap<TransferId, Transfer>,
    bank_links: DashMap<BankLinkId, BankLink>,
    plans: DashMap<PlanId, RatePlan>,
    savings: DashMap<SavingId, Saving>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Create an account. Email must be unique.
    pub fn insert_account(&self, account: Account) -> StoreResult<Account> {
        if self
            .accounts
            .iter()
            .any(|entry| entry.email == account.email)
        {
            return Err(StoreError::Duplicate("email"));
        }
        self.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    pub fn account(&self, id: AccountId) -> StoreResult<Account> {
        self.accounts
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(StoreError::NotFound("account"))
    }

    /// Conditional replace: commits only when the stored version still
    /// equals `expected_version`, then bumps the version. A mismatch means
    /// another writer got there first; callers re-read and retry.
    pub fn replace_account(
        &self,
        expected_version: u64,
        account: Account,
    ) -> StoreResult<Account> {
        let mut entry = self
            .accounts
            .get_mut(&account.id)
            .ok_or(StoreError::NotFound("account"))?;

        if entry.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual: entry.version,
            });
        }

        let mut updated = account;
        updated.version = expected_version + 1;
        *entry = updated.clone();
        Ok(updated)
    }

    pub fn accounts_page(&self, filter: &AccountFilter, query: &PageQuery) -> Page<Account> {
        let mut all: Vec<Account> = self
            .accounts
            .iter()
            .filter(|entry| filter.role.map_or(true, |role| entry.role == role))
            .map(|entry| entry.clone())
            .collect();
        sort_by_time(&mut all, query.sort_dir(), |a| a.created_at);
        Page::from_sorted(all, query)
    }

    // ========================================================================
    // Coin listings
    // ========================================================================

    /// Create a listing. The public symbol must be unique.
    pub fn insert_coin(&self, coin: ListedCoin) -> StoreResult<ListedCoin> {
        if self.coin_symbol_taken(&coin.symbol, None) {
            return Err(StoreError::Duplicate("symbol"));
        }
        self.coins.insert(coin.id, coin.clone());
        Ok(coin)
    }

    pub fn coin(&self, id: CoinId) -> StoreResult<ListedCoin> {
        self.coins
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(StoreError::NotFound("coin"))
    }

    pub fn coin_by_symbol(&self, symbol: &CoinSymbol) -> Option<ListedCoin> {
        self.coins
            .iter()
            .find(|entry| &entry.symbol == symbol)
            .map(|entry| entry.clone())
    }

    pub fn coin_symbol_taken(&self, symbol: &CoinSymbol, exclude: Option<CoinId>) -> bool {
        self.coins
            .iter()
            .any(|entry| &entry.symbol == symbol && Some(entry.id) != exclude)
    }

    /// Unconditional replace (admin edits; last write wins).
    pub fn replace_coin(&self, coin: ListedCoin) -> StoreResult<ListedCoin> {
        let mut entry = self
            .coins
            .get_mut(&coin.id)
            .ok_or(StoreError::NotFound("coin"))?;
        *entry = coin.clone();
        Ok(coin)
    }

    pub fn delete_coin(&self, id: CoinId) -> StoreResult<ListedCoin> {
        self.coins
            .remove(&id)
            .map(|(_, coin)| coin)
            .ok_or(StoreError::NotFound("coin"))
    }

    pub fn coins_page(&self, filter: &CoinFilter, query: &PageQuery) -> Page<ListedCoin> {
        let mut all: Vec<ListedCoin> = self
            .coins
            .iter()
            .filter(|entry| {
                filter.symbol.as_ref().map_or(true, |s| &entry.symbol == s)
                    && filter.is_active.map_or(true, |a| entry.is_active == a)
            })
            .map(|entry| entry.clone())
            .collect();
        sort_by_time(&mut all, query.sort_dir(), |c| c.created_at);
        Page::from_sorted(all, query)
    }

    pub fn active_coins(&self) -> Vec<ListedCoin> {
        let mut all: Vec<ListedCoin> = self
            .coins
            .iter()
            .filter(|entry| entry.is_active)
            .map(|entry| entry.clone())
            .collect();
        all.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        all
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Append an immutable order record.
    pub fn insert_order(&self, order: CoinOrder) -> CoinOrder {
        self.orders.insert(order.id, order.clone());
        order
    }

    pub fn order(&self, id: OrderId) -> StoreResult<CoinOrder> {
        self.orders
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(StoreError::NotFound("order"))
    }

    pub fn orders_page(&self, filter: &OrderFilter, query: &PageQuery) -> Page<CoinOrder> {
        let mut all: Vec<CoinOrder> = self
            .orders
            .iter()
            .filter(|entry| {
                filter.account_id.map_or(true, |id| entry.account_id == id)
                    && filter.symbol.as_ref().map_or(true, |s| &entry.symbol == s)
                    && filter.side.map_or(true, |side| entry.side == side)
            })
            .map(|entry| entry.clone())
            .collect();
        sort_by_time(&mut all, query.sort_dir(), |o| o.created_at);
        Page::from_sorted(all, query)
    }

    // ========================================================================
    // Transfers
    // ========================================================================

    pub fn insert_transfer(&self, transfer: Transfer) -> Transfer {
        self.transfers.insert(transfer.id, transfer.clone());
        transfer
    }

    pub fn transfer(&self, id: TransferId) -> StoreResult<Transfer> {
        self.transfers
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(StoreError::NotFound("transfer"))
    }

    /// Atomic status transition: applies `apply` and commits only when the
    /// current status equals `expected`. Of two racing reviewers exactly
    /// one sees `expected`; the other gets `StatusConflict`.
    pub fn transfer_cas_status(
        &self,
        id: TransferId,
        expected: TransferStatus,
        apply: impl FnOnce(Transfer) -> Transfer,
    ) -> StoreResult<Transfer> {
        let mut entry = self
            .transfers
            .get_mut(&id)
            .ok_or(StoreError::NotFound("transfer"))?;

        if entry.status != expected {
            return Err(StoreError::StatusConflict {
                actual: entry.status,
            });
        }

        let updated = apply(entry.clone());
        *entry = updated.clone();
        Ok(updated)
    }

    pub fn transfers_page(&self, filter: &TransferFilter, query: &PageQuery) -> Page<Transfer> {
        let mut all: Vec<Transfer> = self
            .transfers
            .iter()
            .filter(|entry| {
                filter.account_id.map_or(true, |id| entry.account_id == id)
                    && filter.kind.map_or(true, |k| entry.kind == k)
                    && filter.status.map_or(true, |s| entry.status == s)
            })
            .map(|entry| entry.clone())
            .collect();
        sort_by_time(&mut all, query.sort_dir(), |t| t.created_at);
        Page::from_sorted(all, query)
    }

    // ========================================================================
    // Bank links
    // ========================================================================

    /// Link a bank account. At most one link per account.
    pub fn insert_bank_link(&self, link: BankLink) -> StoreResult<BankLink> {
        if self.bank_link_by_account(link.account_id).is_some() {
            return Err(StoreError::Duplicate("bank link"));
        }
        self.bank_links.insert(link.id, link.clone());
        Ok(link)
    }

    pub fn bank_link(&self, id: BankLinkId) -> StoreResult<BankLink> {
        self.bank_links
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(StoreError::NotFound("bank link"))
    }

    pub fn bank_link_by_account(&self, account_id: AccountId) -> Option<BankLink> {
        self.bank_links
            .iter()
            .find(|entry| entry.account_id == account_id)
            .map(|entry| entry.clone())
    }

    pub fn replace_bank_link(&self, link: BankLink) -> StoreResult<BankLink> {
        let mut entry = self
            .bank_links
            .get_mut(&link.id)
            .ok_or(StoreError::NotFound("bank link"))?;
        *entry = link.clone();
        Ok(link)
    }

    pub fn delete_bank_link(&self, id: BankLinkId) -> StoreResult<BankLink> {
        self.bank_links
            .remove(&id)
            .map(|(_, link)| link)
            .ok_or(StoreError::NotFound("bank link"))
    }

    // ========================================================================
    // Rate plans
    // ========================================================================

    pub fn insert_plan(&self, plan: RatePlan) -> RatePlan {
        self.plans.insert(plan.id, plan.clone());
        plan
    }

    pub fn plan(&self, id: PlanId) -> StoreResult<RatePlan> {
        self.plans
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(StoreError::NotFound("rate plan"))
    }

    pub fn replace_plan(&self, plan: RatePlan) -> StoreResult<RatePlan> {
        let mut entry = self
            .plans
            .get_mut(&plan.id)
            .ok_or(StoreError::NotFound("rate plan"))?;
        *entry = plan.clone();
        Ok(plan)
    }

    pub fn delete_plan(&self, id: PlanId) -> StoreResult<RatePlan> {
        self.plans
            .remove(&id)
            .map(|(_, plan)| plan)
            .ok_or(StoreError::NotFound("rate plan"))
    }

    pub fn plans_page(&self, query: &PageQuery) -> Page<RatePlan> {
        let mut all: Vec<RatePlan> = self.plans.iter().map(|entry| entry.clone()).collect();
        sort_by_time(&mut all, query.sort_dir(), |p| p.created_at);
        Page::from_sorted(all, query)
    }

    // ========================================================================
    // Savings
    // ========================================================================

    pub fn insert_saving(&self, saving: Saving) -> Saving {
        self.savings.insert(saving.id, saving.clone());
        saving
    }

    pub fn saving(&self, id: SavingId) -> StoreResult<Saving> {
        self.savings
            .get(&id)
            .map(|entry| entry.clone())
            .ok_or(StoreError::NotFound("saving"))
    }

    pub fn savings_page(&self, filter: &SavingFilter, query: &PageQuery) -> Page<Saving> {
        let mut all: Vec<Saving> = self
            .savings
            .iter()
            .filter(|entry| {
                filter.account_id.map_or(true, |id| entry.account_id == id)
                    && filter.status.map_or(true, |s| entry.status == s)
            })
            .map(|entry| entry.clone())
            .collect();
        sort_by_time(&mut all, query.sort_dir(), |s| s.start_date);
        Page::from_sorted(all, query)
    }
}

/// Sort documents by a timestamp key in the requested direction.
fn sort_by_time<T, K: Ord>(items: &mut [T], dir: SortDir, key: impl Fn(&T) -> K) {
    match dir {
        SortDir::Asc => items.sort_by_key(key),
        SortDir::Desc => {
            items.sort_by_key(key);
            items.reverse();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinhub_core::{BankDetails, Money};
    use rust_decimal_macros::dec;

    fn account() -> Account {
        Account::new("user@example.com", "User", Role::User)
    }

    fn bank_details() -> BankDetails {
        BankDetails {
            bank_name: "First Example Bank".into(),
            bank_number: "000123456".into(),
            holder_name: "A. User".into(),
        }
    }

    #[test]
    fn test_account_roundtrip() {
        let store = MemoryStore::new();
        let created = store.insert_account(account()).unwrap();

        let loaded = store.account(created.id).unwrap();
        assert_eq!(loaded.email, "user@example.com");
        assert_eq!(loaded.version, 0);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = MemoryStore::new();
        store.insert_account(account()).unwrap();

        let err = store.insert_account(account()).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("email")));
    }

    #[test]
    fn test_replace_account_bumps_version() {
        let store = MemoryStore::new();
        let created = store.insert_account(account()).unwrap();

        let mut updated = created.clone();
        updated.balance = Money::new(dec!(100));
        let committed = store.replace_account(0, updated).unwrap();
        assert_eq!(committed.version, 1);
        assert_eq!(store.account(created.id).unwrap().version, 1);
    }

    #[test]
    fn test_replace_account_detects_stale_version() {
        let store = MemoryStore::new();
        let created = store.insert_account(account()).unwrap();

        // First writer commits.
        store.replace_account(0, created.clone()).unwrap();

        // Second writer still holds version 0.
        let err = store.replace_account(0, created).unwrap_err();
        assert!(matches!(
            err,
            StoreError::VersionConflict {
                expected: 0,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_coin_symbol_unique() {
        let store = MemoryStore::new();
        let coin = ListedCoin::new(CoinSymbol::new("BTCC"), "BTCUSDT", "Coinhub Bitcoin");
        store.insert_coin(coin).unwrap();

        let dup = ListedCoin::new(CoinSymbol::new("btcc"), "BTCUSDT", "Other");
        assert!(matches!(
            store.insert_coin(dup),
            Err(StoreError::Duplicate("symbol"))
        ));
    }

    #[test]
    fn test_transfer_cas_single_winner() {
        let store = MemoryStore::new();
        let reviewer = AccountId::new();
        let transfer = store.insert_transfer(Transfer::pending(
            AccountId::new(),
            TransferKind::Deposit,
            Money::new(dec!(1000)),
            bank_details(),
        ));

        let approved = store
            .transfer_cas_status(transfer.id, TransferStatus::Pending, |t| {
                t.reviewed(TransferStatus::Approved, reviewer)
            })
            .unwrap();
        assert_eq!(approved.status, TransferStatus::Approved);

        // The losing reviewer sees the terminal status.
        let err = store
            .transfer_cas_status(transfer.id, TransferStatus::Pending, |t| {
                t.reviewed(TransferStatus::Rejected, reviewer)
            })
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::StatusConflict {
                actual: TransferStatus::Approved
            }
        ));
    }

    #[test]
    fn test_one_bank_link_per_account() {
        let store = MemoryStore::new();
        let owner = AccountId::new();
        store
            .insert_bank_link(BankLink::new(owner, bank_details()))
            .unwrap();

        let err = store
            .insert_bank_link(BankLink::new(owner, bank_details()))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate("bank link")));
    }

    #[test]
    fn test_order_filters() {
        let store = MemoryStore::new();
        let alice = AccountId::new();
        let bob = AccountId::new();
        let btcc = CoinSymbol::new("BTCC");

        for (who, side) in [
            (alice, OrderSide::Buy),
            (alice, OrderSide::Sell),
            (bob, OrderSide::Buy),
        ] {
            store.insert_order(CoinOrder::executed(
                who,
                btcc.clone(),
                "BTCUSDT",
                side,
                dec!(1).into(),
                Money::new(dec!(10)),
                "Coinhub Bitcoin",
            ));
        }

        let filter = OrderFilter {
            account_id: Some(alice),
            ..Default::default()
        };
        let page = store.orders_page(&filter, &PageQuery::default());
        assert_eq!(page.total_results, 2);

        let filter = OrderFilter {
            side: Some(OrderSide::Buy),
            ..Default::default()
        };
        let page = store.orders_page(&filter, &PageQuery::default());
        assert_eq!(page.total_results, 2);
    }

    #[test]
    fn test_active_coins_sorted_by_symbol() {
        let store = MemoryStore::new();
        let mut inactive = ListedCoin::new(CoinSymbol::new("ZZZ"), "ZZZUSDT", "Z Coin");
        inactive.is_active = false;

        store
            .insert_coin(ListedCoin::new(CoinSymbol::new("ETHC"), "ETHUSDT", "Ether"))
            .unwrap();
        store
            .insert_coin(ListedCoin::new(CoinSymbol::new("BTCC"), "BTCUSDT", "Bitcoin"))
            .unwrap();
        store.insert_coin(inactive).unwrap();

        let active = store.active_coins();
        let symbols: Vec<_> = active.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTCC", "ETHC"]);
    }
}
