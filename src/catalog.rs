//! Static one-line descriptions for the documented booking columns.
//!
//! Pure data with no failure modes. Columns present in the dataset but
//! absent here are simply not described.

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
}

const ENTRIES: &[CatalogEntry] = &[
    CatalogEntry { name: "hotel", description: "Type of hotel (City Hotel or Resort Hotel)" },
    CatalogEntry { name: "is_canceled", description: "Whether the booking was canceled (1 = Yes, 0 = No)" },
    CatalogEntry { name: "lead_time", description: "Days between booking and arrival" },
    CatalogEntry { name: "arrival_date_year", description: "Arrival year" },
    CatalogEntry { name: "arrival_date_month", description: "Arrival month" },
    CatalogEntry { name: "arrival_date_week_number", description: "Arrival week number" },
    CatalogEntry { name: "arrival_date_day_of_month", description: "Arrival day" },
    CatalogEntry { name: "stays_in_weekend_nights", description: "Weekend nights stayed" },
    CatalogEntry { name: "stays_in_week_nights", description: "Weekday nights stayed" },
    CatalogEntry { name: "adults", description: "Number of adults" },
    CatalogEntry { name: "children", description: "Number of children" },
    CatalogEntry { name: "babies", description: "Number of babies" },
    CatalogEntry { name: "meal", description: "Meal plan" },
    CatalogEntry { name: "country", description: "Guest country" },
    CatalogEntry { name: "market_segment", description: "Market segment" },
    CatalogEntry { name: "distribution_channel", description: "Booking channel" },
    CatalogEntry { name: "is_repeated_guest", description: "Repeated guest" },
    CatalogEntry { name: "previous_cancellations", description: "Past cancellations" },
    CatalogEntry { name: "previous_bookings_not_canceled", description: "Past completed bookings" },
    CatalogEntry { name: "reserved_room_type", description: "Reserved room type" },
    CatalogEntry { name: "assigned_room_type", description: "Assigned room type" },
    CatalogEntry { name: "booking_changes", description: "Booking changes" },
    CatalogEntry { name: "deposit_type", description: "Deposit type" },
    CatalogEntry { name: "agent", description: "Agent ID" },
    CatalogEntry { name: "company", description: "Company ID" },
    CatalogEntry { name: "days_in_waiting_list", description: "Days in waiting list" },
    CatalogEntry { name: "customer_type", description: "Customer type" },
    CatalogEntry { name: "adr", description: "Average Daily Rate" },
    CatalogEntry { name: "required_car_parking_spaces", description: "Parking spaces required" },
    CatalogEntry { name: "total_of_special_requests", description: "Special requests" },
    CatalogEntry { name: "reservation_status", description: "Reservation status" },
    CatalogEntry { name: "reservation_status_date", description: "Status date" },
];

pub fn entries() -> &'static [CatalogEntry] {
    ENTRIES
}

pub fn describe(name: &str) -> Option<&'static str> {
    ENTRIES
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| entry.description)
}
