//! [`Quote`]-related definitions.

use common::{money::Currency as DomainCurrency, Date, DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::{future, TryFutureExt as _};
use juniper::{
    graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLObject,
    GraphQLScalar,
};
use service::{
    domain::{self, quote::item},
    query, Query as _,
};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// A priced [`Quote`] issued to an [`api::Client`].
#[derive(Clone, Debug)]
pub struct Quote {
    /// ID of this [`Quote`].
    pub id: Id,

    /// [`domain::Quote`] representing this [`Quote`].
    quote: OnceCell<domain::Quote>,
}

impl From<domain::Quote> for Quote {
    fn from(quote: domain::Quote) -> Self {
        Self {
            id: quote.id.into(),
            quote: OnceCell::new_with(Some(quote)),
        }
    }
}

impl Quote {
    /// Creates a new [`Quote`] with the provided ID.
    ///
    /// # Safety
    ///
    /// Caller must ensure that [`Quote`] with the provided ID exists,
    /// otherwise accessing this [`Quote`] will result with an error.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(id: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            quote: OnceCell::new(),
        }
    }

    /// Returns the [`domain::Quote`] representing this [`Quote`].
    async fn quote(&self, ctx: &Context) -> Result<&domain::Quote, Error> {
        let id = self.id.into();
        self.quote
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::quote::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
                    .and_then(|q| {
                        future::ready(q.ok_or_else(|| {
                            api::query::QuoteError::NotExists.into()
                        }))
                    })
            })
            .await
    }
}

/// A priced `Quote` issued to a `Client`.
#[graphql_object(context = Context)]
impl Quote {
    /// Unique identifier of this `Quote`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Human-readable number of this `Quote`, like `COT-2024-0042`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn number(&self, ctx: &Context) -> Result<Number, Error> {
        Ok(self.quote(ctx).await?.number.clone().into())
    }

    /// `Client` this `Quote` is addressed to.
    ///
    /// `null` if the `Client` has been deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.client",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn client(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Client>, Error> {
        let client_id = self.quote(ctx).await?.client_id;
        #[expect(
            unsafe_code,
            reason = "`Quote` references existing `Client` only"
        )]
        let client =
            client_id.map(|id| unsafe { api::Client::new_unchecked(id) });
        Ok(client)
    }

    /// Name of the `Client` this `Quote` is addressed to.
    ///
    /// Kept even if the `Client` has been deleted.
    pub async fn client_name(
        &self,
        ctx: &Context,
    ) -> Result<api::client::Name, Error> {
        Ok(self.quote(ctx).await?.client_name.clone().into())
    }

    /// `Representative` of the `Client` this `Quote` is addressed to.
    ///
    /// `null` if none is chosen, or the `Representative` has been deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.representative",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn representative(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::client::Representative>, Error> {
        let Some(id) = self.quote(ctx).await?.representative_id else {
            return Ok(None);
        };
        ctx.service()
            .execute(query::client::RepresentativeById::by(id))
            .await
            .map(|r| r.map(Into::into))
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Name of the `Representative` this `Quote` is addressed to.
    ///
    /// The current name is returned while the `Representative` exists, and
    /// the one kept by this `Quote` otherwise.
    pub async fn representative_name(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::client::Name>, Error> {
        let current = self.representative(ctx).await?;
        Ok(match current {
            Some(r) => Some(r.name()),
            None => self
                .quote(ctx)
                .await?
                .representative_name
                .clone()
                .map(Into::into),
        })
    }

    /// Description of the quoted work.
    pub async fn reference(&self, ctx: &Context) -> Result<Reference, Error> {
        Ok(self.quote(ctx).await?.reference.clone().into())
    }

    /// Place where the work is to be done.
    pub async fn location(&self, ctx: &Context) -> Result<Location, Error> {
        Ok(self.quote(ctx).await?.location.clone().into())
    }

    /// `QuoteStatus` of this `Quote`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(&self, ctx: &Context) -> Result<Status, Error> {
        Ok(self.quote(ctx).await?.status.into())
    }

    /// `Date` after which this `Quote` expires, if any.
    pub async fn due_on(&self, ctx: &Context) -> Result<Option<Date>, Error> {
        Ok(self.quote(ctx).await?.due_on.map(|d| d.coerce()))
    }

    /// `Currency` of every amount in this `Quote`.
    pub async fn currency(&self, ctx: &Context) -> Result<Currency, Error> {
        Ok(self.quote(ctx).await?.currency.into())
    }

    /// Travel expenses added to the net value.
    pub async fn travel_expenses(
        &self,
        ctx: &Context,
    ) -> Result<Money, Error> {
        Ok(self.quote(ctx).await?.travel_expenses)
    }

    /// Money totals of this `Quote`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.totals",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn totals(&self, ctx: &Context) -> Result<Totals, Error> {
        Ok(self.quote(ctx).await?.totals.into())
    }

    /// Internal notes on this `Quote`.
    pub async fn notes(&self, ctx: &Context) -> Result<Option<Notes>, Error> {
        Ok(self.quote(ctx).await?.notes.clone().map(Into::into))
    }

    /// `User` who created this `Quote`.
    pub async fn created_by(&self, ctx: &Context) -> Result<api::User, Error> {
        let id = self.quote(ctx).await?.created_by;
        #[expect(unsafe_code, reason = "`Quote` creator is never removed")]
        let user = unsafe { api::User::new_unchecked(id) };
        Ok(user)
    }

    /// `QuoteItem`s of this `Quote`, ordered by their position.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.items",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn items(&self, ctx: &Context) -> Result<Vec<Item>, Error> {
        ctx.service()
            .execute(query::quote::Items::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|items| items.into_iter().map(Into::into).collect())
    }

    /// `Job`s assigned to the labor `QuoteItem`s of this `Quote`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Quote.jobs",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn jobs(&self, ctx: &Context) -> Result<Vec<api::Job>, Error> {
        ctx.service()
            .execute(query::jobs::ByQuote::by(self.id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|jobs| jobs.into_iter().map(Into::into).collect())
    }

    /// Public link the `Client` responds to this `Quote` by.
    ///
    /// `null` until this `Quote` is sent.
    pub async fn response_link(
        &self,
        ctx: &Context,
    ) -> Result<Option<String>, Error> {
        Ok(self
            .quote(ctx)
            .await?
            .token
            .as_ref()
            .map(|t| ctx.service().config().quotes.response_link(t)))
    }

    /// `DateTime` when this `Quote` was last sent to the `Client`.
    pub async fn sent_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.quote(ctx).await?.sent_at.map(|d| d.coerce()))
    }

    /// Email this `Quote` was last sent to.
    pub async fn sent_to(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::client::Email>, Error> {
        Ok(self.quote(ctx).await?.sent_to.clone().map(Into::into))
    }

    /// `DateTime` when the `Client` responded to this `Quote`.
    pub async fn responded_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.quote(ctx).await?.responded_at.map(|d| d.coerce()))
    }

    /// Reason the `Client` rejected this `Quote` with.
    pub async fn rejection_reason(
        &self,
        ctx: &Context,
    ) -> Result<Option<Comment>, Error> {
        Ok(self.quote(ctx).await?.rejection_reason.clone().map(Into::into))
    }

    /// Comments left by the `Client` along with the response.
    pub async fn client_comments(
        &self,
        ctx: &Context,
    ) -> Result<Option<Comment>, Error> {
        Ok(self.quote(ctx).await?.client_comments.clone().map(Into::into))
    }

    /// `DateTime` when this `Quote` was finalized.
    pub async fn finalized_at(
        &self,
        ctx: &Context,
    ) -> Result<Option<DateTime>, Error> {
        Ok(self.quote(ctx).await?.finalized_at.map(|d| d.coerce()))
    }

    /// Indicator whether the `Client` has been asked for a feedback.
    pub async fn feedback_requested(
        &self,
        ctx: &Context,
    ) -> Result<bool, Error> {
        Ok(self.quote(ctx).await?.feedback_requested)
    }

    /// `DateTime` when this `Quote` was created.
    pub async fn created_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.quote(ctx).await?.created_at.coerce())
    }

    /// `DateTime` when this `Quote` was last modified.
    pub async fn updated_at(&self, ctx: &Context) -> Result<DateTime, Error> {
        Ok(self.quote(ctx).await?.updated_at.coerce())
    }
}

/// `Quote` as seen by its `Client` through the public response link.
#[derive(Clone, Debug)]
pub struct PublicQuote {
    /// [`domain::Quote`] being shown.
    quote: domain::Quote,

    /// [`domain::quote::Item`]s of the shown [`domain::Quote`].
    items: Vec<domain::quote::Item>,
}

impl From<(domain::Quote, Vec<domain::quote::Item>)> for PublicQuote {
    fn from(
        (quote, items): (domain::Quote, Vec<domain::quote::Item>),
    ) -> Self {
        Self { quote, items }
    }
}

/// `Quote` as seen by its `Client` through the public response link.
#[graphql_object(context = Context)]
impl PublicQuote {
    /// Human-readable number of this `Quote`.
    #[must_use]
    pub fn number(&self) -> Number {
        self.quote.number.clone().into()
    }

    /// Name of the `Client` this `Quote` is addressed to.
    #[must_use]
    pub fn client_name(&self) -> api::client::Name {
        self.quote.client_name.clone().into()
    }

    /// Description of the quoted work.
    #[must_use]
    pub fn reference(&self) -> Reference {
        self.quote.reference.clone().into()
    }

    /// Place where the work is to be done.
    #[must_use]
    pub fn location(&self) -> Location {
        self.quote.location.clone().into()
    }

    /// `QuoteStatus` of this `Quote`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.quote.status.into()
    }

    /// Indicator whether this `Quote` still awaits a response.
    #[must_use]
    pub fn accepts_response(&self) -> bool {
        self.quote.accepts_response()
    }

    /// `Date` after which this `Quote` expires, if any.
    #[must_use]
    pub fn due_on(&self) -> Option<Date> {
        self.quote.due_on.map(|d| d.coerce())
    }

    /// `Currency` of every amount in this `Quote`.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.quote.currency.into()
    }

    /// Travel expenses added to the net value.
    #[must_use]
    pub fn travel_expenses(&self) -> Money {
        self.quote.travel_expenses
    }

    /// Money totals of this `Quote`.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.quote.totals.into()
    }

    /// `QuoteItem`s of this `Quote`, ordered by their position.
    #[must_use]
    pub fn items(&self) -> Vec<Item> {
        self.items.iter().cloned().map(Into::into).collect()
    }
}

/// Line of a [`Quote`].
#[derive(Clone, Debug, From)]
pub struct Item(domain::quote::Item);

/// Line of a `Quote`.
#[graphql_object(name = "QuoteItem", context = Context)]
impl Item {
    /// Unique identifier of this `QuoteItem`.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.0.id.into()
    }

    /// ID of the `Quote` this `QuoteItem` belongs to.
    #[must_use]
    pub fn quote_id(&self) -> Id {
        self.0.quote_id.into()
    }

    /// Display position of this `QuoteItem`, starting at 1.
    #[must_use]
    pub fn position(&self) -> i32 {
        self.0.position.into()
    }

    /// `QuoteItemKind` of this `QuoteItem`.
    #[must_use]
    pub fn kind(&self) -> ItemKind {
        self.0.kind().into()
    }

    /// Description of this `QuoteItem`.
    #[must_use]
    pub fn description(&self) -> ItemDescription {
        self.0.line.description().clone().into()
    }

    /// Quantity of units, or the estimated hours of labor.
    #[must_use]
    pub fn quantity(&self) -> Quantity {
        self.0.line.quantity().into()
    }

    /// Price of a single unit, or the hourly rate of labor.
    #[must_use]
    pub fn unit_price(&self) -> Money {
        self.0.line.unit_price()
    }

    /// Subtotal of this `QuoteItem`.
    pub fn subtotal(&self) -> Result<Money, Error> {
        let id = self.0.id;
        self.0.subtotal().ok_or_else(|| {
            Error::internal(&format!("`QuoteItem({id})` subtotal overflows"))
        })
    }

    /// `Material` of a `MATERIAL` kind `QuoteItem`, if it's still
    /// registered.
    ///
    /// Requires authentication.
    pub async fn material(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Material>, Error> {
        _ = ctx.current_session().await?;
        let material_id = match &self.0.line {
            item::Line::Material { material_id, .. } => *material_id,
            item::Line::Service { .. } | item::Line::Labor { .. } => None,
        };
        #[expect(
            unsafe_code,
            reason = "`QuoteItem` references existing `Material` only"
        )]
        let material =
            material_id.map(|id| unsafe { api::Material::new_unchecked(id) });
        Ok(material)
    }

    /// Hours the `Material` of a `MATERIAL` kind `QuoteItem` is going to be
    /// used for.
    #[must_use]
    pub fn usage_hours(&self) -> Option<Quantity> {
        match &self.0.line {
            item::Line::Material { usage_hours, .. } => {
                Some((*usage_hours).into())
            }
            item::Line::Service { .. } | item::Line::Labor { .. } => None,
        }
    }
}

/// Contents of a `QuoteItem` to add or replace.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "QuoteItemInput")]
pub struct ItemInput {
    /// Kind of the `QuoteItem`.
    pub kind: ItemKind,

    /// Description of the `QuoteItem`.
    pub description: ItemDescription,

    /// Quantity of units, or the estimated hours of labor.
    pub quantity: Quantity,

    /// Price of a single unit, or the hourly rate of labor.
    ///
    /// Must be in the `Currency` of the `Quote`.
    pub unit_price: Money,

    /// `Material` of a `MATERIAL` kind `QuoteItem`.
    pub material_id: Option<api::material::Id>,

    /// Hours the `Material` is going to be used for.
    ///
    /// Considered for the `MATERIAL` kind only.
    pub usage_hours: Option<Quantity>,
}

impl From<ItemInput> for item::Line {
    fn from(input: ItemInput) -> Self {
        let ItemInput {
            kind,
            description,
            quantity,
            unit_price,
            material_id,
            usage_hours,
        } = input;

        match kind {
            ItemKind::Service => Self::Service {
                description: description.into(),
                quantity: quantity.into(),
                unit_price,
            },
            ItemKind::Material => Self::Material {
                material_id: material_id.map(Into::into),
                description: description.into(),
                quantity: quantity.into(),
                unit_price,
                usage_hours: usage_hours
                    .map_or(item::Quantity::ZERO, Into::into),
            },
            ItemKind::Labor => Self::Labor {
                description: description.into(),
                hours: quantity.into(),
                hourly_rate: unit_price,
            },
        }
    }
}

/// Money totals of a `Quote`.
#[derive(Clone, Copy, Debug, GraphQLObject)]
#[graphql(name = "QuoteTotals")]
pub struct Totals {
    /// Sum of the `SERVICE` kind `QuoteItem`s.
    pub services: Money,

    /// Sum of the `MATERIAL` kind `QuoteItem`s.
    pub materials: Money,

    /// Sum of the `LABOR` kind `QuoteItem`s.
    pub labor: Money,

    /// Sum of every `QuoteItem` plus the travel expenses.
    pub net: Money,

    /// Value-added tax on the `net` value.
    pub vat: Money,

    /// Final amount to pay.
    pub total: Money,
}

impl From<domain::quote::Totals> for Totals {
    fn from(totals: domain::quote::Totals) -> Self {
        let domain::quote::Totals {
            services,
            materials,
            labor,
            net,
            vat,
            total,
        } = totals;
        Self {
            services,
            materials,
            labor,
            net,
            vat,
            total,
        }
    }
}

/// Unique identifier of a `Quote`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::quote::Id)]
#[into(domain::quote::Id)]
#[graphql(name = "QuoteId", transparent)]
pub struct Id(Uuid);

/// Unique identifier of a `QuoteItem`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(item::Id)]
#[into(item::Id)]
#[graphql(name = "QuoteItemId", transparent)]
pub struct ItemId(Uuid);

/// Human-readable number of a `Quote`, like `COT-2024-0042`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "QuoteNumber",
    with = scalar::Via::<domain::quote::Number>,
)]
pub struct Number(domain::quote::Number);

/// Access token of a `Quote` response link.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "QuoteToken",
    with = scalar::Via::<domain::quote::Token>,
)]
pub struct Token(domain::quote::Token);

/// Description of the work a `Quote` is about.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "QuoteReference",
    with = scalar::Via::<domain::quote::Reference>,
)]
pub struct Reference(domain::quote::Reference);

/// Place where the work of a `Quote` is to be done.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "QuoteLocation",
    with = scalar::Via::<domain::quote::Location>,
)]
pub struct Location(domain::quote::Location);

/// Internal notes on a `Quote`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "QuoteNotes",
    with = scalar::Via::<domain::quote::Notes>,
)]
pub struct Notes(domain::quote::Notes);

/// Comment of a `Client` on a `Quote`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "QuoteComment",
    with = scalar::Via::<domain::quote::Comment>,
)]
pub struct Comment(domain::quote::Comment);

/// Description of a `QuoteItem`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "QuoteItemDescription",
    with = scalar::Via::<item::Description>,
)]
pub struct ItemDescription(item::Description);

/// Non-negative decimal quantity of units or hours.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "Quantity", with = scalar::Via::<item::Quantity>)]
pub struct Quantity(item::Quantity);

/// Status of a `Quote` in its lifecycle.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "QuoteStatus")]
pub enum Status {
    /// Being prepared, editable.
    Draft,

    /// Sent to the `Client`.
    Sent,

    /// Reviewed internally after being sent.
    Reviewed,

    /// Approved by the `Client`.
    Approved,

    /// Rejected by the `Client`.
    Rejected,

    /// `Client` requested changes.
    ChangesRequested,

    /// Due date passed without a response.
    Expired,

    /// Work is done.
    Finalized,
}

impl From<domain::quote::Status> for Status {
    fn from(status: domain::quote::Status) -> Self {
        use domain::quote::Status as S;

        match status {
            S::Draft => Self::Draft,
            S::Sent => Self::Sent,
            S::Reviewed => Self::Reviewed,
            S::Approved => Self::Approved,
            S::Rejected => Self::Rejected,
            S::ChangesRequested => Self::ChangesRequested,
            S::Expired => Self::Expired,
            S::Finalized => Self::Finalized,
        }
    }
}

impl From<Status> for domain::quote::Status {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => Self::Draft,
            Status::Sent => Self::Sent,
            Status::Reviewed => Self::Reviewed,
            Status::Approved => Self::Approved,
            Status::Rejected => Self::Rejected,
            Status::ChangesRequested => Self::ChangesRequested,
            Status::Expired => Self::Expired,
            Status::Finalized => Self::Finalized,
        }
    }
}

/// Kind of a `QuoteItem`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "QuoteItemKind")]
pub enum ItemKind {
    /// Service provided by the company.
    Service,

    /// `Material` supplied or used during the work.
    Material,

    /// Labor of the company employees.
    Labor,
}

impl From<item::Kind> for ItemKind {
    fn from(kind: item::Kind) -> Self {
        match kind {
            item::Kind::Service => Self::Service,
            item::Kind::Material => Self::Material,
            item::Kind::Labor => Self::Labor,
        }
    }
}

/// Currency of `Money` amounts.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
pub enum Currency {
    /// Chilean Peso.
    Clp,

    /// US Dollar.
    Usd,

    /// Euro.
    Eur,
}

impl From<DomainCurrency> for Currency {
    fn from(currency: DomainCurrency) -> Self {
        match currency {
            DomainCurrency::Clp => Self::Clp,
            DomainCurrency::Usd => Self::Usd,
            DomainCurrency::Eur => Self::Eur,
        }
    }
}

impl From<Currency> for DomainCurrency {
    fn from(currency: Currency) -> Self {
        match currency {
            Currency::Clp => Self::Clp,
            Currency::Usd => Self::Usd,
            Currency::Eur => Self::Eur,
        }
    }
}

/// Response of a `Client` to a `Quote`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "QuoteResponse")]
pub enum Response {
    /// `Quote` is approved.
    Approve,

    /// `Quote` is rejected, a reason is required.
    Reject,

    /// Changes to the `Quote` are requested.
    RequestChanges,
}

pub mod list {
    //! Definitions related to [`Quote`] list.

    use service::{query, read};

    use super::{Id, Quote};

    define_list! {
        id = Id,
        node = Quote,
        read = read::quote::list,
        names = (
            "QuoteListCursor",
            "QuoteListEdge",
            "QuoteListConnection",
            "QuoteListPageInfo",
        ),
        total_count = query::quotes::TotalCount,
        count_by = read::quote::list::Filter,
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};
    use service::domain::quote::item;

    use super::{ItemInput, ItemKind};

    fn input(kind: ItemKind) -> ItemInput {
        ItemInput {
            kind,
            description: "Mantención bomba sumergible"
                .parse::<item::Description>()
                .unwrap()
                .into(),
            quantity: "2.5".parse::<item::Quantity>().unwrap().into(),
            unit_price: Money::new(15_000.into(), Currency::Clp),
            material_id: None,
            usage_hours: Some("4".parse::<item::Quantity>().unwrap().into()),
        }
    }

    #[test]
    fn maps_labor_quantity_to_hours() {
        let line = item::Line::from(input(ItemKind::Labor));

        let item::Line::Labor {
            hours, hourly_rate, ..
        } = line
        else {
            panic!("expected labor line");
        };
        assert_eq!(hours.to_string(), "2.5");
        assert_eq!(hourly_rate, Money::new(15_000.into(), Currency::Clp));
    }

    #[test]
    fn keeps_usage_hours_for_materials_only() {
        let item::Line::Material { usage_hours, .. } =
            item::Line::from(input(ItemKind::Material))
        else {
            panic!("expected material line");
        };
        assert_eq!(usage_hours.to_string(), "4");

        assert_eq!(
            item::Line::from(input(ItemKind::Service)).kind(),
            item::Kind::Service,
        );
    }

    #[test]
    fn computes_line_subtotal() {
        let line = item::Line::from(input(ItemKind::Service));

        assert_eq!(
            line.subtotal(),
            Some(Money::new(37_500.into(), Currency::Clp)),
        );
    }
}
