use chrono::NaiveDate;
use mockall::mock;
use salon_core::time::Interval;
use uuid::Uuid;

use crate::models::{DbAppointment, DbBarber, DbClient, DbService, DbUser};

// Mock repositories for testing
mock! {
    pub UserRepo {
        pub async fn get_user_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbUser>>;

        pub async fn get_user_by_email(
            &self,
            email: String,
        ) -> eyre::Result<Option<DbUser>>;
    }
}

mock! {
    pub BarberRepo {
        pub async fn get_barber_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBarber>>;

        pub async fn get_barber_by_user_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbBarber>>;
    }
}

mock! {
    pub ClientRepo {
        pub async fn get_client_by_user_id(
            &self,
            user_id: Uuid,
        ) -> eyre::Result<Option<DbClient>>;
    }
}

mock! {
    pub ServiceRepo {
        pub async fn get_service_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbService>>;
    }
}

mock! {
    pub AppointmentRepo {
        pub async fn get_active_intervals(
            &self,
            barber_id: Uuid,
            date: NaiveDate,
        ) -> eyre::Result<Vec<Interval>>;

        pub async fn get_appointment_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbAppointment>>;
    }
}
