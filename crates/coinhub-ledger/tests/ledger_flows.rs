//! End-to-end ledger flows: trading, transfer approval, savings.

use coinhub_core::{
    Account, AccountId, BankDetails, BankLink, Candle, CoinSymbol, ListedCoin, Money, OrderSide,
    Quantity, RatePlan, Role, TransferKind, TransferStatus,
};
use coinhub_feed::{BoxFuture, FeedResult, PriceSource};
use coinhub_ledger::{
    LedgerError, PriceOracle, SavingsDesk, TransferDesk, WalletLedger,
};
use coinhub_store::MemoryStore;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Price source that always quotes one fixed close.
struct StaticPrice(Decimal);

impl PriceSource for StaticPrice {
    fn delayed_candles<'a>(
        &'a self,
        _feed_symbol: &'a str,
        _interval: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, FeedResult<Vec<Candle>>> {
        Box::pin(async move {
            let bar = Candle {
                time: 1_700_000_000,
                open: self.0,
                high: self.0,
                low: self.0,
                close: self.0,
                volume: Decimal::ONE,
            };
            Ok(vec![bar; limit.min(1)])
        })
    }
}

struct Fixture {
    store: Arc<MemoryStore>,
    wallet: WalletLedger,
    transfers: TransferDesk,
    savings: SavingsDesk,
    account_id: AccountId,
    admin_id: AccountId,
}

impl Fixture {
    /// Account with the given balance, a linked bank, and an active BTCC
    /// listing quoted at `price`.
    fn new(balance: Money, price: Decimal) -> Self {
        let store = Arc::new(MemoryStore::new());

        let mut account = Account::new("user@example.com", "User", Role::User);
        account.balance = balance;
        let account = store.insert_account(account).unwrap();

        let admin = store
            .insert_account(Account::new("admin@example.com", "Admin", Role::Admin))
            .unwrap();

        store
            .insert_bank_link(BankLink::new(
                account.id,
                BankDetails {
                    bank_name: "First Example Bank".into(),
                    bank_number: "000123456".into(),
                    holder_name: "A. User".into(),
                },
            ))
            .unwrap();

        store
            .insert_coin(ListedCoin::new(
                CoinSymbol::new("BTCC"),
                "BTCUSDT",
                "Coinhub Bitcoin",
            ))
            .unwrap();

        let oracle = Arc::new(PriceOracle::new(
            Arc::clone(&store),
            Arc::new(StaticPrice(price)),
        ));

        Self {
            wallet: WalletLedger::new(Arc::clone(&store), oracle),
            transfers: TransferDesk::new(Arc::clone(&store)),
            savings: SavingsDesk::new(Arc::clone(&store)),
            account_id: account.id,
            admin_id: admin.id,
            store,
        }
    }

    fn balance(&self) -> Money {
        self.store.account(self.account_id).unwrap().balance
    }

    fn holding(&self, symbol: &str) -> Quantity {
        self.store
            .account(self.account_id)
            .unwrap()
            .holding(&CoinSymbol::new(symbol))
    }
}

fn btcc() -> CoinSymbol {
    CoinSymbol::new("BTCC")
}

// ============================================================================
// Trading
// ============================================================================

#[tokio::test]
async fn buy_debits_balance_and_credits_wallet() {
    let fx = Fixture::new(Money::new(dec!(100000)), dec!(43500.25));

    let order = fx
        .wallet
        .trade(fx.account_id, &btcc(), OrderSide::Buy, dec!(0.5).into())
        .await
        .unwrap();

    assert_eq!(order.total, Money::new(dec!(21750.125)));
    assert_eq!(order.price, Money::new(dec!(43500.25)));
    assert_eq!(fx.balance(), Money::new(dec!(78249.875)));
    assert_eq!(fx.holding("BTCC"), Quantity::new(dec!(0.5)));
}

#[tokio::test]
async fn buy_then_sell_restores_balance_and_clears_wallet() {
    let fx = Fixture::new(Money::new(dec!(100000)), dec!(43500.25));
    let qty = Quantity::new(dec!(0.5));

    fx.wallet
        .trade(fx.account_id, &btcc(), OrderSide::Buy, qty)
        .await
        .unwrap();
    fx.wallet
        .trade(fx.account_id, &btcc(), OrderSide::Sell, qty)
        .await
        .unwrap();

    assert_eq!(fx.balance(), Money::new(dec!(100000)));
    // The wallet entry is removed at exactly zero, not left as 0.
    let account = fx.store.account(fx.account_id).unwrap();
    assert!(account.wallet.is_empty());
}

#[tokio::test]
async fn buy_with_insufficient_funds_leaves_no_trace() {
    let fx = Fixture::new(Money::new(dec!(100)), dec!(43500.25));

    let err = fx
        .wallet
        .trade(fx.account_id, &btcc(), OrderSide::Buy, dec!(0.5).into())
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(fx.balance(), Money::new(dec!(100)));
    let orders = fx.store.orders_page(&Default::default(), &Default::default());
    assert_eq!(orders.total_results, 0);
}

#[tokio::test]
async fn sell_more_than_held_is_rejected() {
    let fx = Fixture::new(Money::new(dec!(100000)), dec!(100));

    fx.wallet
        .trade(fx.account_id, &btcc(), OrderSide::Buy, dec!(1).into())
        .await
        .unwrap();

    let err = fx
        .wallet
        .trade(fx.account_id, &btcc(), OrderSide::Sell, dec!(1.5).into())
        .await
        .unwrap_err();

    assert!(matches!(err, LedgerError::InsufficientHoldings { .. }));
    assert_eq!(fx.holding("BTCC"), Quantity::new(dec!(1)));
}

#[tokio::test]
async fn trade_against_unknown_or_inactive_coin_fails() {
    let fx = Fixture::new(Money::new(dec!(1000)), dec!(100));

    let err = fx
        .wallet
        .trade(
            fx.account_id,
            &CoinSymbol::new("NOPE"),
            OrderSide::Buy,
            dec!(1).into(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::CoinNotFound(_)));

    let mut delisted = fx.store.coin_by_symbol(&btcc()).unwrap();
    delisted.is_active = false;
    fx.store.replace_coin(delisted).unwrap();

    let err = fx
        .wallet
        .trade(fx.account_id, &btcc(), OrderSide::Buy, dec!(1).into())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::CoinInactive(_)));
}

#[tokio::test]
async fn zero_quantity_trade_is_validation_error() {
    let fx = Fixture::new(Money::new(dec!(1000)), dec!(100));

    let err = fx
        .wallet
        .trade(fx.account_id, &btcc(), OrderSide::Buy, dec!(0).into())
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn wallet_view_prices_holdings() {
    let fx = Fixture::new(Money::new(dec!(1000)), dec!(100));

    fx.wallet
        .trade(fx.account_id, &btcc(), OrderSide::Buy, dec!(2).into())
        .await
        .unwrap();

    let view = fx.wallet.wallet_view(fx.account_id).await.unwrap();
    assert_eq!(view.balance, Money::new(dec!(800)));
    assert_eq!(view.holdings.len(), 1);
    assert_eq!(view.holdings[0].value, Money::new(dec!(200)));
    assert_eq!(view.total_holdings_value, Money::new(dec!(200)));
}

// ============================================================================
// Transfer approval
// ============================================================================

#[test]
fn withdraw_creation_checks_balance_point_in_time() {
    let fx = Fixture::new(Money::new(dec!(500000)), dec!(100));

    let err = fx
        .transfers
        .create(
            fx.account_id,
            TransferKind::Withdraw,
            Money::new(dec!(1000000)),
        )
        .unwrap_err();

    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
}

#[test]
fn create_without_bank_link_fails() {
    let fx = Fixture::new(Money::new(dec!(1000)), dec!(100));
    let unlinked = fx
        .store
        .insert_account(Account::new("other@example.com", "Other", Role::User))
        .unwrap();

    let err = fx
        .transfers
        .create(unlinked.id, TransferKind::Deposit, Money::new(dec!(100)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NoBankLink));
}

#[test]
fn approved_deposit_credits_balance() {
    let fx = Fixture::new(Money::new(dec!(50000)), dec!(100));

    let transfer = fx
        .transfers
        .create(
            fx.account_id,
            TransferKind::Deposit,
            Money::new(dec!(200000)),
        )
        .unwrap();

    let approved = fx.transfers.approve(transfer.id, fx.admin_id).unwrap();

    assert_eq!(approved.status, TransferStatus::Approved);
    assert_eq!(approved.reviewed_by, Some(fx.admin_id));
    assert!(approved.reviewed_at.is_some());
    assert_eq!(fx.balance(), Money::new(dec!(250000)));
}

#[test]
fn approved_withdraw_debits_balance() {
    let fx = Fixture::new(Money::new(dec!(1000)), dec!(100));

    let transfer = fx
        .transfers
        .create(fx.account_id, TransferKind::Withdraw, Money::new(dec!(400)))
        .unwrap();
    fx.transfers.approve(transfer.id, fx.admin_id).unwrap();

    assert_eq!(fx.balance(), Money::new(dec!(600)));
}

#[test]
fn withdraw_approval_recheck_is_authoritative() {
    let fx = Fixture::new(Money::new(dec!(1000)), dec!(100));

    // Passes the advisory creation-time check...
    let transfer = fx
        .transfers
        .create(fx.account_id, TransferKind::Withdraw, Money::new(dec!(800)))
        .unwrap();

    // ...but the balance moves before review.
    let drain = fx
        .transfers
        .create(fx.account_id, TransferKind::Withdraw, Money::new(dec!(500)))
        .unwrap();
    fx.transfers.approve(drain.id, fx.admin_id).unwrap();

    let err = fx.transfers.approve(transfer.id, fx.admin_id).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

    // The failed approval left the transfer pending and the balance alone.
    assert_eq!(
        fx.store.transfer(transfer.id).unwrap().status,
        TransferStatus::Pending
    );
    assert_eq!(fx.balance(), Money::new(dec!(500)));
}

#[test]
fn terminal_transfers_cannot_be_reviewed_again() {
    let fx = Fixture::new(Money::new(dec!(1000)), dec!(100));

    let transfer = fx
        .transfers
        .create(fx.account_id, TransferKind::Deposit, Money::new(dec!(100)))
        .unwrap();
    fx.transfers.approve(transfer.id, fx.admin_id).unwrap();

    // Second approval fails and does not double-credit.
    let err = fx.transfers.approve(transfer.id, fx.admin_id).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::TransferNotPending(TransferStatus::Approved)
    ));
    assert_eq!(fx.balance(), Money::new(dec!(1100)));

    // Rejecting an approved transfer also fails.
    let err = fx.transfers.reject(transfer.id, fx.admin_id).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::TransferNotPending(TransferStatus::Approved)
    ));
}

#[test]
fn rejection_has_no_balance_effect() {
    let fx = Fixture::new(Money::new(dec!(1000)), dec!(100));

    let transfer = fx
        .transfers
        .create(fx.account_id, TransferKind::Deposit, Money::new(dec!(100)))
        .unwrap();
    let rejected = fx.transfers.reject(transfer.id, fx.admin_id).unwrap();

    assert_eq!(rejected.status, TransferStatus::Rejected);
    assert_eq!(rejected.reviewed_by, Some(fx.admin_id));
    assert_eq!(fx.balance(), Money::new(dec!(1000)));

    let err = fx.transfers.approve(transfer.id, fx.admin_id).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::TransferNotPending(TransferStatus::Rejected)
    ));
}

// ============================================================================
// Savings
// ============================================================================

#[test]
fn saving_debits_and_snapshots_plan() {
    let fx = Fixture::new(Money::new(dec!(10000)), dec!(100));
    let plan = fx.store.insert_plan(RatePlan::new(
        "6M Fixed",
        6,
        dec!(0.045),
        Money::new(dec!(1000)),
    ));

    let saving = fx
        .savings
        .register(fx.account_id, plan.id, Money::new(dec!(5000)))
        .unwrap();

    assert_eq!(fx.balance(), Money::new(dec!(5000)));
    assert_eq!(saving.terms.annual_rate, dec!(0.045));
    assert_eq!(saving.terms.term_months, 6);
}

#[test]
fn saving_below_minimum_is_rejected() {
    let fx = Fixture::new(Money::new(dec!(10000)), dec!(100));
    let plan = fx.store.insert_plan(RatePlan::new(
        "6M Fixed",
        6,
        dec!(0.045),
        Money::new(dec!(1000)),
    ));

    let err = fx
        .savings
        .register(fx.account_id, plan.id, Money::new(dec!(999)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(fx.balance(), Money::new(dec!(10000)));
}

#[test]
fn saving_exceeding_balance_is_rejected() {
    let fx = Fixture::new(Money::new(dec!(2000)), dec!(100));
    let plan = fx.store.insert_plan(RatePlan::new(
        "6M Fixed",
        6,
        dec!(0.045),
        Money::new(dec!(1000)),
    ));

    let err = fx
        .savings
        .register(fx.account_id, plan.id, Money::new(dec!(3000)))
        .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
    assert_eq!(fx.balance(), Money::new(dec!(2000)));
}

// ============================================================================
// Balance invariant under random operation sequences
// ============================================================================

#[tokio::test]
async fn balance_never_negative_under_random_ops() {
    let fx = Fixture::new(Money::new(dec!(1000)), dec!(37.5));

    // Deterministic xorshift64 driver.
    let mut state: u64 = 0x1234_5678_9abc_def0;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    for _ in 0..400 {
        let amount = Money::new(Decimal::from(next() % 700 + 1));
        let quantity = Quantity::new(Decimal::new((next() % 400 + 1) as i64, 1));

        let result = match next() % 5 {
            0 => fx
                .transfers
                .create(fx.account_id, TransferKind::Deposit, amount)
                .and_then(|t| fx.transfers.approve(t.id, fx.admin_id))
                .map(|_| ()),
            1 => fx
                .transfers
                .create(fx.account_id, TransferKind::Withdraw, amount)
                .and_then(|t| fx.transfers.approve(t.id, fx.admin_id))
                .map(|_| ()),
            2 => fx
                .transfers
                .create(fx.account_id, TransferKind::Withdraw, amount)
                .and_then(|t| fx.transfers.reject(t.id, fx.admin_id))
                .map(|_| ()),
            3 => fx
                .wallet
                .trade(fx.account_id, &btcc(), OrderSide::Buy, quantity)
                .await
                .map(|_| ()),
            _ => fx
                .wallet
                .trade(fx.account_id, &btcc(), OrderSide::Sell, quantity)
                .await
                .map(|_| ()),
        };

        // Individual operations may legitimately be rejected; the
        // invariant is that no accepted or rejected operation ever
        // drives the balance or a holding negative.
        let _ = result;
        let account = fx.store.account(fx.account_id).unwrap();
        assert!(
            !account.balance.is_negative(),
            "balance went negative: {}",
            account.balance
        );
        for (symbol, qty) in &account.wallet {
            assert!(qty.is_positive(), "non-positive holding for {symbol}");
        }
    }
}
