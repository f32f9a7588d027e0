//! Application wiring for the tourbook CLI.
//!
//! `App` owns the configuration, the login session, the API client and the
//! tour repository, and runs one `Command` against them.

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

use tourbook_core::models::{BookingRequest, LoginRequest, Tour};
use tourbook_core::utils::{format_price, truncate_string};
use tourbook_core::{
    ApiClient, CacheManager, Config, DetachedTasks, LocalStore, Notifier, ReadOrigin, Session,
    Severity, TourRepository,
};

use crate::notifier::StderrNotifier;
use crate::Command;

// ============================================================================
// Constants
// ============================================================================

/// Column width for tour names in listings
const NAME_WIDTH: usize = 36;

/// Column width for destinations in listings
const DESTINATION_WIDTH: usize = 20;

pub struct App {
    config: Config,
    session: Session,
    api: ApiClient,
    tours: TourRepository<ApiClient>,
    notifier: StderrNotifier,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::from_config(&config).context("Failed to build HTTP client")?;

        let mut session = Session::new(config.data_dir());
        match session.load() {
            Ok(true) => debug!("Restored previous session"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "Failed to load session, starting logged out"),
        }

        let cache = CacheManager::new(LocalStore::new(config.store_location()));
        let tours = TourRepository::new(api.clone(), cache, DetachedTasks::new());

        Ok(Self {
            config,
            session,
            api,
            tours,
            notifier: StderrNotifier,
        })
    }

    pub fn notifier(&self) -> &StderrNotifier {
        &self.notifier
    }

    pub async fn run(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Tours => self.list_tours().await,
            Command::Tour(id) => self.show_tour(id).await,
            Command::Search(text) => self.search(&text).await,
            Command::CacheInfo => self.cache_info().await,
            Command::ClearCache => {
                self.tours.clear_cache().await;
                self.notifier.success("Offline cache cleared");
                Ok(())
            }
            Command::Promotions => self.list_promotions().await,
            Command::Departures(tour_id) => self.list_departures(tour_id).await,
            Command::Book {
                departure_id,
                quantity,
            } => self.book(departure_id, quantity).await,
            Command::Bookings => self.list_bookings().await,
            Command::Cancel(booking_id) => self.cancel(booking_id).await,
            Command::Login { remember } => self.login(remember).await,
            Command::Logout => self.logout(),
            Command::WhoAmI => {
                self.whoami();
                Ok(())
            }
            Command::Help => Ok(()),
        }
    }

    /// Let detached cache writes finish and release the database.
    pub async fn shutdown(&self) {
        self.tours.tasks().drain().await;
        self.tours.cache().store().close().await;
    }

    // ===== Tours =====

    async fn list_tours(&self) -> Result<()> {
        let (tours, origin) = self.tours.get_all_tours_with_origin().await;
        if origin == ReadOrigin::Cache {
            let info = self.tours.cache_info().await;
            self.notifier.notify(
                &format!("Backend unreachable, showing offline copy ({})", info.age_display()),
                Severity::Warning,
            );
        }
        print_tours(&tours);
        Ok(())
    }

    async fn show_tour(&self, id: i64) -> Result<()> {
        let Some(tour) = self.tours.get_tour(id).await else {
            bail!("Tour {} not found (backend unreachable and not cached)", id);
        };

        println!("{} (#{})", tour.name, tour.id);
        if let Some(ref destination) = tour.destination {
            println!("  Destination: {}", destination);
        }
        if let Some(ref tour_type) = tour.tour_type {
            println!("  Type:        {}", tour_type.name);
        }
        match (tour.price, tour.discounted_price()) {
            (Some(price), Some(discounted)) if discounted < price => println!(
                "  Price:       {} (was {})",
                format_price(discounted),
                format_price(price)
            ),
            (Some(price), _) => println!("  Price:       {}", format_price(price)),
            _ => {}
        }
        if let Some(ref promotion) = tour.promotion {
            println!("  Promotion:   {} -{}%", promotion.name, promotion.percent);
        }
        if let Some(ref description) = tour.description {
            println!("\n{}", description);
        }
        Ok(())
    }

    async fn search(&self, text: &str) -> Result<()> {
        let tours = self.tours.search_cached(text).await;
        if tours.is_empty() && self.tours.cache_info().await.count == 0 {
            self.notifier.notify(
                "Offline cache is empty; run `tourbook tours` while online first",
                Severity::Info,
            );
        }
        print_tours(&tours);
        Ok(())
    }

    async fn cache_info(&self) -> Result<()> {
        let info = self.tours.cache_info().await;
        println!("Cached tours: {}", info.count);
        println!("Last update:  {}", info.age_display());
        if info.count > 0 && info.is_stale() {
            println!("(stale - run `tourbook tours` while online to refresh)");
        }
        Ok(())
    }

    // ===== Promotions & departures =====

    async fn list_promotions(&self) -> Result<()> {
        let promotions = self.api.fetch_promotions().await?;
        for promotion in &promotions {
            println!(
                "{:<30} {:>5}%  {} .. {}  [{}]",
                truncate_string(&promotion.name, 30),
                promotion.percent,
                promotion.start_date.format("%d/%m/%Y"),
                promotion.end_date.format("%d/%m/%Y"),
                promotion.status()
            );
        }
        Ok(())
    }

    async fn list_departures(&self, tour_id: i64) -> Result<()> {
        let departures = self.api.fetch_upcoming_departures_for_tour(tour_id).await?;
        if departures.is_empty() {
            println!("No upcoming departures");
            return Ok(());
        }
        for departure in &departures {
            let slots = match departure.available_slots {
                Some(0) => "full".to_string(),
                Some(n) => format!("{} left", n),
                None => format!("max {}", departure.max_quantity),
            };
            println!(
                "#{:<5} {}  from {:<16} {:>14}  {}",
                departure.id.unwrap_or_default(),
                departure.departure_time.format("%d/%m/%Y %H:%M"),
                truncate_string(&departure.departure_location, 16),
                format_price(departure.final_price()),
                slots
            );
        }
        Ok(())
    }

    // ===== Bookings =====

    async fn book(&self, departure_id: i64, quantity: u32) -> Result<()> {
        let user_id = self.require_user()?;

        let availability = self
            .api
            .check_departure_availability(departure_id, quantity)
            .await?;
        if !availability.available {
            bail!("Not enough places left on departure {}", departure_id);
        }

        let request = BookingRequest::new(user_id, departure_id, quantity);
        let receipt = self.api.create_booking(&request).await?;
        if !receipt.success {
            bail!("Booking rejected: {}", receipt.message);
        }

        let message = match receipt.booking_id {
            Some(id) => format!("Booked {} place(s), booking #{}", quantity, id),
            None => format!("Booked {} place(s)", quantity),
        };
        self.notifier.success(&message);
        Ok(())
    }

    async fn list_bookings(&self) -> Result<()> {
        let user_id = self.require_user()?;
        let bookings = self.api.fetch_user_bookings(user_id).await?;
        if bookings.is_empty() {
            println!("No bookings yet");
            return Ok(());
        }
        for booking in &bookings {
            let when = booking
                .departure_time
                .map(|t| t.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "-".to_string());
            let total = booking
                .total_payment
                .map(format_price)
                .unwrap_or_else(|| "-".to_string());
            let status = if booking.is_cancelled() {
                "cancelled"
            } else {
                booking.payment_status.as_deref().unwrap_or("pending")
            };
            println!(
                "#{:<5} {:<30} {}  x{:<3} {:>14}  {}",
                booking.id,
                truncate_string(booking.tour_name.as_deref().unwrap_or("?"), 30),
                when,
                booking.quantity,
                total,
                status
            );
        }
        Ok(())
    }

    async fn cancel(&self, booking_id: i64) -> Result<()> {
        self.require_user()?;
        let receipt = self.api.cancel_booking(booking_id).await?;
        if !receipt.success {
            bail!("Cancellation rejected: {}", receipt.message);
        }
        self.notifier.success(&format!("Booking #{} cancelled", booking_id));
        Ok(())
    }

    // ===== Session =====

    async fn login(&mut self, remember: bool) -> Result<()> {
        let email = Self::prompt_email(self.config.last_email.as_deref())?;
        let password = rpassword::prompt_password("Password: ")?;
        if email.is_empty() || password.is_empty() {
            bail!("Email and password required");
        }

        let user = self
            .api
            .login(&LoginRequest {
                email: email.clone(),
                password,
            })
            .await?;

        self.config.remember_login(&email, remember);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        let name = user.display_name().to_string();
        self.session.login(user)?;
        self.notifier.success(&format!("Logged in as {}", name));
        Ok(())
    }

    fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        self.config.forget_login();
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
        self.notifier.success("Logged out");
        Ok(())
    }

    fn whoami(&self) {
        let Some(user) = self.session.current_user() else {
            println!("Not logged in");
            return;
        };
        let role = if user.is_admin() {
            "admin"
        } else if user.is_tour_guide() {
            "tour guide"
        } else {
            "customer"
        };
        println!("{} ({})", user.display_name(), role);
        if let Some(at) = self.session.logged_in_at() {
            println!("Logged in since {}", at.format("%d/%m/%Y %H:%M"));
        }
    }

    fn require_user(&self) -> Result<i64> {
        self.session
            .user_id()
            .context("Not logged in - run `tourbook login` first")
    }

    fn prompt_email(default: Option<&str>) -> Result<String> {
        match default {
            Some(email) => print!("Email [{}]: ", email),
            None => print!("Email: "),
        }
        io::stdout().flush()?;

        let mut email = String::new();
        io::stdin().read_line(&mut email)?;
        let email = email.trim();
        Ok(match (email.is_empty(), default) {
            (true, Some(default)) => default.to_string(),
            _ => email.to_string(),
        })
    }
}

fn print_tours(tours: &[Tour]) {
    if tours.is_empty() {
        println!("No tours");
        return;
    }
    for tour in tours {
        let price = tour
            .discounted_price()
            .or(tour.price)
            .map(format_price)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "#{:<5} {:<name_w$} {:<dest_w$} {:>14}",
            tour.id,
            truncate_string(&tour.name, NAME_WIDTH),
            truncate_string(tour.destination.as_deref().unwrap_or("-"), DESTINATION_WIDTH),
            price,
            name_w = NAME_WIDTH,
            dest_w = DESTINATION_WIDTH,
        );
    }
}
