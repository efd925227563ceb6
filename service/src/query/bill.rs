//! Live [`Bill`] [`Query`].

use common::{
    operations::{By, Select},
    Clock,
};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, Occupancy},
        Booking, Order,
    },
    infra::{database, Database},
    read::booking::Bill,
    Query, Service,
};

/// [`Query`] computing the live [`Bill`] of a [`Booking`] at the current
/// instant.
///
/// This is what polling dashboards tick with. It runs the exact computation
/// settlement runs, so the previewed grand total always matches what a
/// settlement happening at the same instant would persist. Read-only and
/// safe to call arbitrarily often.
///
/// [`None`] is returned if the [`Booking`] does not exist.
#[derive(Clone, Copy, Debug)]
pub struct Live {
    /// ID of the [`Booking`] to bill.
    pub booking_id: booking::Id,
}

impl<Db, Clk> Query<Live> for Service<Db, Clk>
where
    Clk: Clock,
    Db: Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Occupancy>, booking::Id>>,
            Ok = Vec<Occupancy>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Order>, booking::Id>>,
            Ok = Vec<Order>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Option<Bill>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Live { booking_id }: Live,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(booking) = self
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        let occupancies = self
            .database()
            .execute(Select(By::<Vec<Occupancy>, _>::new(booking_id)))
            .await
            .map_err(tracerr::wrap!())?;
        let orders = self
            .database()
            .execute(Select(By::<Vec<Order>, _>::new(booking_id)))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Some(Bill::compute(
            &booking,
            &occupancies,
            &orders,
            self.clock().now(),
            self.config().currency,
        )))
    }
}
