//! Port for customer onboarding records and their document metadata.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::{
    Attachment, Customer, CustomerDraft, Memorandum, MemorandumDraft, NewAttachment, Partner,
    PartnerDraft, TradeLicense, TradeLicenseDraft,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by customer repository adapters.
    pub enum CustomerPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "customer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "customer repository query failed: {message}",
        /// The operation did not finish within its time budget.
        Timeout => "customer repository operation timed out",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Store a customer and return its identifier.
    async fn insert_customer(&self, draft: &CustomerDraft)
    -> Result<i32, CustomerPersistenceError>;

    /// Every customer, newest first.
    async fn all_customers(&self) -> Result<Vec<Customer>, CustomerPersistenceError>;

    /// Fetch a customer by identifier.
    async fn find_customer(&self, id: i32) -> Result<Option<Customer>, CustomerPersistenceError>;

    /// Record metadata for a document already written to storage.
    async fn insert_attachment(
        &self,
        attachment: &NewAttachment,
    ) -> Result<i32, CustomerPersistenceError>;

    /// Attachments of a customer, oldest first.
    async fn attachments_for(
        &self,
        customer_id: i32,
    ) -> Result<Vec<Attachment>, CustomerPersistenceError>;

    /// The most recent trade license of a customer.
    async fn find_trade_license(
        &self,
        customer_id: i32,
    ) -> Result<Option<TradeLicense>, CustomerPersistenceError>;

    /// Store a trade license and return its identifier.
    async fn insert_trade_license(
        &self,
        draft: &TradeLicenseDraft,
    ) -> Result<i32, CustomerPersistenceError>;

    /// Partners of a customer, oldest first.
    async fn partners_for(&self, customer_id: i32)
    -> Result<Vec<Partner>, CustomerPersistenceError>;

    /// Store a partner and return its identifier.
    async fn insert_partner(&self, draft: &PartnerDraft) -> Result<i32, CustomerPersistenceError>;

    /// Memorandum representatives of a customer, oldest first.
    async fn memoranda_for(
        &self,
        customer_id: i32,
    ) -> Result<Vec<Memorandum>, CustomerPersistenceError>;

    /// Store a memorandum representative and return its identifier.
    async fn insert_memorandum(
        &self,
        draft: &MemorandumDraft,
    ) -> Result<i32, CustomerPersistenceError>;
}

#[derive(Debug, Default)]
struct FixtureCustomerState {
    customers: Vec<Customer>,
    attachments: Vec<Attachment>,
    trade_licenses: Vec<TradeLicense>,
    partners: Vec<Partner>,
    memoranda: Vec<Memorandum>,
    last_id: i32,
}

impl FixtureCustomerState {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }
}

/// In-memory repository used when no database is configured.
///
/// Identifiers come from a single counter shared by every table.
#[derive(Debug, Default)]
pub struct FixtureCustomerRepository {
    state: Mutex<FixtureCustomerState>,
}

impl FixtureCustomerRepository {
    /// Attachments stored so far, across customers.
    pub fn attachments(&self) -> Vec<Attachment> {
        self.lock().attachments.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FixtureCustomerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CustomerRepository for FixtureCustomerRepository {
    async fn insert_customer(
        &self,
        draft: &CustomerDraft,
    ) -> Result<i32, CustomerPersistenceError> {
        let mut state = self.lock();
        let customer_id = state.next_id();
        state.customers.push(Customer {
            customer_id,
            details: draft.clone(),
        });
        Ok(customer_id)
    }

    async fn all_customers(&self) -> Result<Vec<Customer>, CustomerPersistenceError> {
        let mut customers = self.lock().customers.clone();
        customers.reverse();
        Ok(customers)
    }

    async fn find_customer(&self, id: i32) -> Result<Option<Customer>, CustomerPersistenceError> {
        Ok(self
            .lock()
            .customers
            .iter()
            .find(|c| c.customer_id == id)
            .cloned())
    }

    async fn insert_attachment(
        &self,
        attachment: &NewAttachment,
    ) -> Result<i32, CustomerPersistenceError> {
        let mut state = self.lock();
        let file_id = state.next_id();
        state.attachments.push(Attachment {
            file_id,
            customer_id: attachment.customer_id,
            customer_code: attachment.customer_code.clone(),
            document: attachment.document.clone(),
        });
        Ok(file_id)
    }

    async fn attachments_for(
        &self,
        customer_id: i32,
    ) -> Result<Vec<Attachment>, CustomerPersistenceError> {
        Ok(self
            .lock()
            .attachments
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn find_trade_license(
        &self,
        customer_id: i32,
    ) -> Result<Option<TradeLicense>, CustomerPersistenceError> {
        Ok(self
            .lock()
            .trade_licenses
            .iter()
            .rev()
            .find(|t| t.details.customer_id == customer_id)
            .cloned())
    }

    async fn insert_trade_license(
        &self,
        draft: &TradeLicenseDraft,
    ) -> Result<i32, CustomerPersistenceError> {
        let mut state = self.lock();
        let trade_license_id = state.next_id();
        state.trade_licenses.push(TradeLicense {
            trade_license_id,
            details: draft.clone(),
        });
        Ok(trade_license_id)
    }

    async fn partners_for(
        &self,
        customer_id: i32,
    ) -> Result<Vec<Partner>, CustomerPersistenceError> {
        Ok(self
            .lock()
            .partners
            .iter()
            .filter(|p| p.details.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn insert_partner(&self, draft: &PartnerDraft) -> Result<i32, CustomerPersistenceError> {
        let mut state = self.lock();
        let partner_id = state.next_id();
        state.partners.push(Partner {
            partner_id,
            details: draft.clone(),
        });
        Ok(partner_id)
    }

    async fn memoranda_for(
        &self,
        customer_id: i32,
    ) -> Result<Vec<Memorandum>, CustomerPersistenceError> {
        Ok(self
            .lock()
            .memoranda
            .iter()
            .filter(|m| m.details.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn insert_memorandum(
        &self,
        draft: &MemorandumDraft,
    ) -> Result<i32, CustomerPersistenceError> {
        let mut state = self.lock();
        let memorandum_id = state.next_id();
        state.memoranda.push(Memorandum {
            memorandum_id,
            details: draft.clone(),
        });
        Ok(memorandum_id)
    }
}
