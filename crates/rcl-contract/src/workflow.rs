//! Order creation and the receivable lifecycle.
//!
//! ```text
//! ToBeAccepted -> Accepted -> ToBeDiscounted -> Discounted -> Redeemed
//! ```
//!
//! Each operation names its actors, verifies each of them exactly once,
//! loads the target, checks status, ownership and amounts, and only then
//! buffers the rewritten record. Orders are never rewritten after creation.

use tracing::info;

use rcl_gate::{AcceptPolicy, DiscountConfirmPolicy};
use rcl_store::{LedgerStore, Transaction};
use rcl_types::{RecOrder, Receivable, ReceivableStatus, Role};

use crate::allocator;
use crate::contract::ReceivableContract;
use crate::error::{ContractError, ContractResult};
use crate::query;

impl<S: LedgerStore> ReceivableContract<S> {
    // ---- Committing operations ----

    pub fn create_order(&self, company_id: &str, supplier_id: &str, amount: u64) -> ContractResult<RecOrder> {
        self.execute("create_order", |tx| {
            self.create_order_in(tx, company_id, supplier_id, amount)
        })
    }

    pub fn sign_receivable(
        &self,
        order_no: &str,
        supplier_id: &str,
        discount_apply_amount: u64,
    ) -> ContractResult<Receivable> {
        self.execute("sign_receivable", |tx| {
            self.sign_receivable_in(tx, order_no, supplier_id, discount_apply_amount)
        })
    }

    pub fn accept_receivable(&self, company_id: &str, receivable_no: &str) -> ContractResult<Receivable> {
        self.execute("accept_receivable", |tx| {
            self.accept_receivable_in(tx, company_id, receivable_no)
        })
    }

    pub fn transfer_receivable(
        &self,
        receivable_no: &str,
        owner_id: &str,
        new_supplier_id: &str,
    ) -> ContractResult<Receivable> {
        self.execute("transfer_receivable", |tx| {
            self.transfer_receivable_in(tx, receivable_no, owner_id, new_supplier_id)
        })
    }

    pub fn apply_discount(&self, receivable_no: &str, owner_id: &str, financial_id: &str) -> ContractResult<Receivable> {
        self.execute("apply_discount", |tx| {
            self.apply_discount_in(tx, receivable_no, owner_id, financial_id)
        })
    }

    pub fn discount_confirm(&self, receivable_no: &str, financial_id: &str) -> ContractResult<Receivable> {
        self.execute("discount_confirm", |tx| {
            self.discount_confirm_in(tx, receivable_no, financial_id)
        })
    }

    pub fn redeem(&self, receivable_no: &str, company_id: &str) -> ContractResult<Receivable> {
        self.execute("redeem", |tx| self.redeem_in(tx, receivable_no, company_id))
    }

    // ---- In-transaction operations ----

    /// Create an order from `company_id` to `supplier_id` under the next
    /// free sequence number.
    pub fn create_order_in(
        &self,
        tx: &mut Transaction<'_, S>,
        company_id: &str,
        supplier_id: &str,
        amount: u64,
    ) -> ContractResult<RecOrder> {
        let company = self.verify(tx, company_id, Role::Company)?;
        let supplier = self.verify(tx, supplier_id, Role::Supplier)?;
        if amount == 0 {
            return Err(ContractError::InvalidAmount { amount });
        }

        let seq = allocator::next_sequence(tx, &self.config)?;
        let order = RecOrder::new(seq, company.id(), supplier.id(), amount);
        query::put_one(tx, &order.order_no, &order)?;
        info!(
            order = %order.order_no,
            company = %order.owner_id,
            supplier = %order.acceptor_id,
            amount,
            "order created"
        );
        Ok(order)
    }

    /// Sign `order_no` as its named supplier, creating the receivable at the
    /// key the order reserved.
    pub fn sign_receivable_in(
        &self,
        tx: &mut Transaction<'_, S>,
        order_no: &str,
        supplier_id: &str,
        discount_apply_amount: u64,
    ) -> ContractResult<Receivable> {
        let order: RecOrder = query::get_one(tx, order_no)?;
        let company = self.verify(tx, &order.owner_id, Role::Company)?;
        let supplier = self.verify(tx, supplier_id, Role::Supplier)?;

        if supplier.id() != order.acceptor_id {
            return Err(ContractError::CounterpartyMismatch {
                expected: order.acceptor_id,
                actual: supplier.id().to_string(),
            });
        }
        if tx.contains(&order.receivable_no)? {
            return Err(ContractError::DuplicateReceivable {
                receivable_no: order.receivable_no,
            });
        }
        if discount_apply_amount > order.total_amount {
            return Err(ContractError::AmountExceeded {
                requested: discount_apply_amount,
                limit: order.total_amount,
            });
        }

        let signed_time = self.clock.now();
        let receivable = Receivable {
            receivable_no: order.receivable_no,
            order_no: order.order_no,
            signed_time,
            expire_time: signed_time.plus_months(self.config.validity_months)?,
            owner_id: supplier.id().to_string(),
            acceptor_id: company.id().to_string(),
            discount_apply_amount,
            status: ReceivableStatus::ToBeAccepted,
            discount_applicant_id: None,
        };
        query::put_one(tx, &receivable.receivable_no, &receivable)?;
        info!(
            receivable = %receivable.receivable_no,
            order = %receivable.order_no,
            owner = %receivable.owner_id,
            expires = %receivable.expire_time,
            "receivable signed"
        );
        Ok(receivable)
    }

    pub fn accept_receivable_in(
        &self,
        tx: &mut Transaction<'_, S>,
        company_id: &str,
        receivable_no: &str,
    ) -> ContractResult<Receivable> {
        let company = self.verify(tx, company_id, Role::Company)?;
        let mut receivable: Receivable = query::get_one(tx, receivable_no)?;
        expect_status(&receivable, ReceivableStatus::ToBeAccepted)?;
        if self.guard.config().accept == AcceptPolicy::AcceptorOnly && company.id() != receivable.acceptor_id {
            return Err(ContractError::CounterpartyMismatch {
                expected: receivable.acceptor_id,
                actual: company.id().to_string(),
            });
        }

        advance(&mut receivable, ReceivableStatus::Accepted)?;
        self.store_receivable(tx, &receivable)?;
        Ok(receivable)
    }

    /// Hand an accepted receivable from its current supplier to another.
    pub fn transfer_receivable_in(
        &self,
        tx: &mut Transaction<'_, S>,
        receivable_no: &str,
        owner_id: &str,
        new_supplier_id: &str,
    ) -> ContractResult<Receivable> {
        let owner = self.verify(tx, owner_id, Role::Supplier)?;
        let new_owner = self.verify(tx, new_supplier_id, Role::Supplier)?;
        let mut receivable: Receivable = query::get_one(tx, receivable_no)?;
        expect_status(&receivable, ReceivableStatus::Accepted)?;
        expect_owner(&receivable, owner.id())?;

        receivable.owner_id = new_owner.id().to_string();
        query::put_one(tx, &receivable.receivable_no, &receivable)?;
        info!(
            receivable = %receivable.receivable_no,
            from = %owner.id(),
            to = %receivable.owner_id,
            "receivable transferred"
        );
        Ok(receivable)
    }

    /// Ask `financial_id` to discount an accepted receivable held by `owner_id`.
    pub fn apply_discount_in(
        &self,
        tx: &mut Transaction<'_, S>,
        receivable_no: &str,
        owner_id: &str,
        financial_id: &str,
    ) -> ContractResult<Receivable> {
        let owner = self.verify(tx, owner_id, Role::Supplier)?;
        let financial = self.verify(tx, financial_id, Role::Financial)?;
        let mut receivable: Receivable = query::get_one(tx, receivable_no)?;
        expect_status(&receivable, ReceivableStatus::Accepted)?;
        expect_owner(&receivable, owner.id())?;

        advance(&mut receivable, ReceivableStatus::ToBeDiscounted)?;
        receivable.discount_applicant_id = Some(financial.id().to_string());
        self.store_receivable(tx, &receivable)?;
        Ok(receivable)
    }

    /// Complete a pending discount; the confirming institution becomes the holder.
    pub fn discount_confirm_in(
        &self,
        tx: &mut Transaction<'_, S>,
        receivable_no: &str,
        financial_id: &str,
    ) -> ContractResult<Receivable> {
        let financial = self.verify(tx, financial_id, Role::Financial)?;
        let mut receivable: Receivable = query::get_one(tx, receivable_no)?;
        expect_status(&receivable, ReceivableStatus::ToBeDiscounted)?;
        if self.guard.config().discount_confirm == DiscountConfirmPolicy::ApplicantOnly
            && receivable.discount_applicant_id.as_deref() != Some(financial.id())
        {
            return Err(ContractError::CounterpartyMismatch {
                expected: receivable.discount_applicant_id.unwrap_or_default(),
                actual: financial.id().to_string(),
            });
        }

        advance(&mut receivable, ReceivableStatus::Discounted)?;
        receivable.owner_id = financial.id().to_string();
        self.store_receivable(tx, &receivable)?;
        Ok(receivable)
    }

    /// Settle a discounted receivable by the company that owes it.
    pub fn redeem_in(
        &self,
        tx: &mut Transaction<'_, S>,
        receivable_no: &str,
        company_id: &str,
    ) -> ContractResult<Receivable> {
        let company = self.verify(tx, company_id, Role::Company)?;
        let mut receivable: Receivable = query::get_one(tx, receivable_no)?;
        expect_status(&receivable, ReceivableStatus::Discounted)?;
        if receivable.acceptor_id != company.id() {
            return Err(ContractError::CounterpartyMismatch {
                expected: receivable.acceptor_id,
                actual: company.id().to_string(),
            });
        }

        advance(&mut receivable, ReceivableStatus::Redeemed)?;
        receivable.owner_id = company.id().to_string();
        self.store_receivable(tx, &receivable)?;
        Ok(receivable)
    }

    fn store_receivable(&self, tx: &mut Transaction<'_, S>, receivable: &Receivable) -> ContractResult<()> {
        query::put_one(tx, &receivable.receivable_no, receivable)?;
        info!(
            receivable = %receivable.receivable_no,
            status = %receivable.status,
            owner = %receivable.owner_id,
            "receivable advanced"
        );
        Ok(())
    }
}

fn expect_status(receivable: &Receivable, expected: ReceivableStatus) -> ContractResult<()> {
    if receivable.status == expected {
        Ok(())
    } else {
        Err(ContractError::StatusMismatch {
            receivable_no: receivable.receivable_no.clone(),
            expected,
            actual: receivable.status,
        })
    }
}

fn expect_owner(receivable: &Receivable, claimed: &str) -> ContractResult<()> {
    if receivable.owner_id == claimed {
        Ok(())
    } else {
        Err(ContractError::OwnershipMismatch {
            expected_owner: receivable.owner_id.clone(),
            actual: claimed.to_string(),
        })
    }
}

/// Move `receivable` one stage along the chain to `target`.
fn advance(receivable: &mut Receivable, target: ReceivableStatus) -> ContractResult<()> {
    if !receivable.status.can_advance_to(target) {
        let expected = ReceivableStatus::CHAIN
            .into_iter()
            .find(|status| status.can_advance_to(target))
            .unwrap_or(target);
        return Err(ContractError::StatusMismatch {
            receivable_no: receivable.receivable_no.clone(),
            expected,
            actual: receivable.status,
        });
    }
    receivable.status = target;
    Ok(())
}
