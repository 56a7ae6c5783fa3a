use futures::TryStreamExt;
use mongodb::bson::{doc, to_bson, DateTime, Document};
use mongodb::options::{
    FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument,
};
use mongodb::{Collection, Database, IndexModel};
use uuid::Uuid;

use service_core::error::AppError;

use crate::models::{
    Admin, Car, CarStatus, DocumentLabel, Expense, ExpenseLabel, Loan, Payment, PaymentSummary,
    Sale, SellRequest, SellRequestStatus, StoredFile,
};

/// Typed access to every collection the back office owns.
#[derive(Clone)]
pub struct Repository {
    sell_requests: Collection<SellRequest>,
    cars: Collection<Car>,
    sales: Collection<Sale>,
    payments: Collection<Payment>,
    loans: Collection<Loan>,
    expenses: Collection<Expense>,
    expense_labels: Collection<ExpenseLabel>,
    document_labels: Collection<DocumentLabel>,
    admins: Collection<Admin>,
    stored_files: Collection<StoredFile>,
    counters: Collection<Document>,
}

impl Repository {
    pub fn new(db: &Database) -> Self {
        Self {
            sell_requests: db.collection("sell_requests"),
            cars: db.collection("cars"),
            sales: db.collection("sales"),
            payments: db.collection("payments"),
            loans: db.collection("loans"),
            expenses: db.collection("expenses"),
            expense_labels: db.collection("expense_labels"),
            document_labels: db.collection("document_labels"),
            admins: db.collection("admins"),
            stored_files: db.collection("stored_files"),
            counters: db.collection("counters"),
        }
    }

    /// Create the indexes the queries below rely on. The unique sparse index
    /// on `invoiceNumber` is the uniqueness backstop behind the counter.
    pub async fn init_indexes(&self) -> Result<(), AppError> {
        let status_request_idx = IndexModel::builder()
            .keys(doc! { "status": 1, "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("request_status_idx".to_string())
                    .build(),
            )
            .build();
        self.sell_requests
            .create_index(status_request_idx, None)
            .await?;

        let status_car_idx = IndexModel::builder()
            .keys(doc! { "status": 1, "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("car_status_idx".to_string())
                    .build(),
            )
            .build();
        self.cars.create_index(status_car_idx, None).await?;

        let sale_payment_idx = IndexModel::builder()
            .keys(doc! { "saleId": 1, "createdAt": 1 })
            .options(
                IndexOptions::builder()
                    .name("sale_payment_idx".to_string())
                    .build(),
            )
            .build();
        let invoice_number_idx = IndexModel::builder()
            .keys(doc! { "invoiceNumber": 1 })
            .options(
                IndexOptions::builder()
                    .name("invoice_number_idx".to_string())
                    .unique(true)
                    .sparse(true)
                    .build(),
            )
            .build();
        self.payments
            .create_indexes([sale_payment_idx, invoice_number_idx], None)
            .await?;

        let admin_email_idx = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("admin_email_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.admins.create_index(admin_email_idx, None).await?;

        let expense_label_idx = IndexModel::builder()
            .keys(doc! { "label": 1 })
            .options(
                IndexOptions::builder()
                    .name("expense_label_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.expense_labels
            .create_index(expense_label_idx, None)
            .await?;

        let document_label_idx = IndexModel::builder()
            .keys(doc! { "label": 1 })
            .options(
                IndexOptions::builder()
                    .name("document_label_idx".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.document_labels
            .create_index(document_label_idx, None)
            .await?;

        tracing::info!("back-office indexes initialized");
        Ok(())
    }

    // ---------- sell requests ----------

    pub async fn insert_sell_request(&self, request: &SellRequest) -> Result<(), AppError> {
        self.sell_requests.insert_one(request, None).await?;
        Ok(())
    }

    pub async fn find_sell_request(&self, id: Uuid) -> Result<Option<SellRequest>, AppError> {
        let request = self
            .sell_requests
            .find_one(doc! { "_id": id.to_string() }, None)
            .await?;
        Ok(request)
    }

    pub async fn replace_sell_request(&self, request: &SellRequest) -> Result<(), AppError> {
        self.sell_requests
            .replace_one(doc! { "_id": request.id.to_string() }, request, None)
            .await?;
        Ok(())
    }

    pub async fn list_sell_requests(
        &self,
        status: SellRequestStatus,
    ) -> Result<Vec<SellRequest>, AppError> {
        let status = to_bson(&status).map_err(|e| AppError::Database(e.into()))?;
        let options = FindOptions::builder()
            .sort(doc! { "updatedAt": -1 })
            .build();
        let cursor = self
            .sell_requests
            .find(doc! { "status": status }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn list_sell_requests_with_documents(&self) -> Result<Vec<SellRequest>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "updatedAt": -1 })
            .build();
        let cursor = self
            .sell_requests
            .find(doc! { "sellerDocuments.0": { "$exists": true } }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count_sell_requests(&self, status: SellRequestStatus) -> Result<u64, AppError> {
        let status = to_bson(&status).map_err(|e| AppError::Database(e.into()))?;
        Ok(self
            .sell_requests
            .count_documents(doc! { "status": status }, None)
            .await?)
    }

    // ---------- cars ----------

    pub async fn insert_car(&self, car: &Car) -> Result<(), AppError> {
        self.cars.insert_one(car, None).await?;
        Ok(())
    }

    pub async fn find_car(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        Ok(self
            .cars
            .find_one(doc! { "_id": id.to_string() }, None)
            .await?)
    }

    pub async fn replace_car(&self, car: &Car) -> Result<(), AppError> {
        self.cars
            .replace_one(doc! { "_id": car.id.to_string() }, car, None)
            .await?;
        Ok(())
    }

    pub async fn list_cars(&self) -> Result<Vec<Car>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();
        let cursor = self.cars.find(doc! {}, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn list_cars_by_status(&self, status: CarStatus) -> Result<Vec<Car>, AppError> {
        let status = to_bson(&status).map_err(|e| AppError::Database(e.into()))?;
        let options = FindOptions::builder()
            .sort(doc! { "soldAt": -1, "createdAt": -1 })
            .build();
        let cursor = self.cars.find(doc! { "status": status }, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn count_cars(&self, status: CarStatus) -> Result<u64, AppError> {
        let status = to_bson(&status).map_err(|e| AppError::Database(e.into()))?;
        Ok(self.cars.count_documents(doc! { "status": status }, None).await?)
    }

    // ---------- sales ----------

    pub async fn insert_sale(&self, sale: &Sale) -> Result<(), AppError> {
        self.sales.insert_one(sale, None).await?;
        Ok(())
    }

    pub async fn find_sale(&self, id: Uuid) -> Result<Option<Sale>, AppError> {
        Ok(self
            .sales
            .find_one(doc! { "_id": id.to_string() }, None)
            .await?)
    }

    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1 })
            .build();
        let cursor = self.sales.find(doc! {}, options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Compare-and-set of the running balance: matches only when the stored
    /// version is still `expected_version`, so two concurrent payment
    /// submissions can never both apply against the same read state.
    pub async fn update_sale_summary(
        &self,
        sale_id: Uuid,
        expected_version: i64,
        summary: &PaymentSummary,
    ) -> Result<bool, AppError> {
        let summary = to_bson(summary).map_err(|e| AppError::Database(e.into()))?;
        let result = self
            .sales
            .update_one(
                doc! {
                    "_id": sale_id.to_string(),
                    "paymentSummary.version": expected_version,
                },
                doc! {
                    "$set": {
                        "paymentSummary": summary,
                        "updatedAt": DateTime::now(),
                    }
                },
                None,
            )
            .await?;
        Ok(result.modified_count == 1)
    }

    // ---------- payments ----------

    pub async fn insert_payment(&self, payment: &Payment) -> Result<(), AppError> {
        self.payments.insert_one(payment, None).await?;
        Ok(())
    }

    pub async fn find_payment(&self, id: Uuid) -> Result<Option<Payment>, AppError> {
        Ok(self
            .payments
            .find_one(doc! { "_id": id.to_string() }, None)
            .await?)
    }

    pub async fn list_payments_for_sale(&self, sale_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let options = FindOptions::builder().sort(doc! { "createdAt": 1 }).build();
        let cursor = self
            .payments
            .find(doc! { "saleId": sale_id.to_string() }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn list_payments_for_sales(
        &self,
        sale_ids: &[Uuid],
    ) -> Result<Vec<Payment>, AppError> {
        let ids: Vec<String> = sale_ids.iter().map(|id| id.to_string()).collect();
        let options = FindOptions::builder()
            .sort(doc! { "invoiceDate": 1 })
            .build();
        let cursor = self
            .payments
            .find(doc! { "saleId": { "$in": ids } }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    /// Next value of the per-year invoice sequence. The counter document is
    /// created on first use; `$inc` inside `findOneAndUpdate` makes each
    /// allocation atomic, so numbers are unique by construction.
    pub async fn next_invoice_sequence(&self, year: i32) -> Result<i64, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": format!("invoice-{year}") },
                doc! { "$inc": { "seq": 1_i64 } },
                options,
            )
            .await?
            .ok_or_else(|| {
                AppError::Database(anyhow::anyhow!("invoice counter upsert returned no document"))
            })?;
        counter
            .get_i64("seq")
            .map_err(|e| AppError::Database(anyhow::anyhow!("invoice counter malformed: {e}")))
    }

    // ---------- loans ----------

    pub async fn insert_loan(&self, loan: &Loan) -> Result<(), AppError> {
        self.loans.insert_one(loan, None).await?;
        Ok(())
    }

    pub async fn find_loan_for_sale(&self, sale_id: Uuid) -> Result<Option<Loan>, AppError> {
        Ok(self
            .loans
            .find_one(doc! { "saleId": sale_id.to_string() }, None)
            .await?)
    }

    // ---------- expenses ----------

    pub async fn insert_expense(&self, expense: &Expense) -> Result<(), AppError> {
        self.expenses.insert_one(expense, None).await?;
        Ok(())
    }

    pub async fn list_expenses(&self, person: Option<&str>) -> Result<Vec<Expense>, AppError> {
        let filter = match person {
            Some(person) => doc! { "person": person },
            None => doc! {},
        };
        let options = FindOptions::builder().sort(doc! { "date": -1 }).build();
        let cursor = self.expenses.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    pub async fn delete_expense(&self, id: Uuid) -> Result<bool, AppError> {
        let result = self
            .expenses
            .delete_one(doc! { "_id": id.to_string() }, None)
            .await?;
        Ok(result.deleted_count == 1)
    }

    // ---------- label masters ----------

    pub async fn upsert_expense_label(&self, label: &str) -> Result<(), AppError> {
        let options = mongodb::options::UpdateOptions::builder().upsert(true).build();
        self.expense_labels
            .update_one(
                doc! { "label": label },
                doc! { "$setOnInsert": {
                    "_id": Uuid::new_v4().to_string(),
                    "label": label,
                    "isActive": true,
                } },
                options,
            )
            .await?;
        Ok(())
    }

    pub async fn upsert_document_label(&self, label: &str) -> Result<(), AppError> {
        let options = mongodb::options::UpdateOptions::builder().upsert(true).build();
        self.document_labels
            .update_one(
                doc! { "label": label },
                doc! { "$setOnInsert": {
                    "_id": Uuid::new_v4().to_string(),
                    "label": label,
                    "isActive": true,
                } },
                options,
            )
            .await?;
        Ok(())
    }

    pub async fn list_expense_labels(&self) -> Result<Vec<String>, AppError> {
        let options = FindOptions::builder().sort(doc! { "label": 1 }).build();
        let cursor = self
            .expense_labels
            .find(doc! { "isActive": true }, options)
            .await?;
        let labels: Vec<ExpenseLabel> = cursor.try_collect().await?;
        Ok(labels.into_iter().map(|l| l.label).collect())
    }

    pub async fn list_document_labels(&self) -> Result<Vec<String>, AppError> {
        let options = FindOptions::builder().sort(doc! { "label": 1 }).build();
        let cursor = self
            .document_labels
            .find(doc! { "isActive": true }, options)
            .await?;
        let labels: Vec<DocumentLabel> = cursor.try_collect().await?;
        Ok(labels.into_iter().map(|l| l.label).collect())
    }

    // ---------- admins ----------

    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        Ok(self.admins.find_one(doc! { "email": email }, None).await?)
    }

    pub async fn insert_admin(&self, admin: &Admin) -> Result<(), AppError> {
        self.admins.insert_one(admin, None).await?;
        Ok(())
    }

    // ---------- stored files ----------

    pub async fn insert_stored_file(&self, file: &StoredFile) -> Result<(), AppError> {
        self.stored_files.insert_one(file, None).await?;
        Ok(())
    }

    pub async fn find_stored_file_by_key(
        &self,
        storage_key: &str,
    ) -> Result<Option<StoredFile>, AppError> {
        Ok(self
            .stored_files
            .find_one(doc! { "storageKey": storage_key }, None)
            .await?)
    }
}
