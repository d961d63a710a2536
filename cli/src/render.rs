//! Plain-text output for the terminal.

use admin_core::marketplace::{MarketplaceCreator, MarketplaceListing};
use admin_core::types::{Listing, OfferingTerms, Profile};
use admin_core::workflow::create::{ListingResult, PictureOutcome};
use admin_core::{CreationReport, OutcomeStatus, Pagination, User, UserDetail};

pub fn user_row(user: &User) -> String {
    format!(
        "{}  {:<7}  {:<9}  {:<5}  {}  <{}>",
        user.id,
        user.user_type.as_str(),
        user.status.as_str(),
        if user.email_verified { "yes" } else { "no" },
        user.name,
        user.email
    )
}

pub fn users(users: &[User], pagination: &Pagination) {
    if users.is_empty() {
        println!("No users found");
    }
    for user in users {
        println!("{}", user_row(user));
    }
    println!();
    println!("{}", pagination.summary());
    if pagination.total_pages() > 1 {
        println!("Page {} of {}", pagination.page, pagination.total_pages());
    }
}

fn field(label: &str, value: Option<&str>) {
    println!("  {label:<18} {}", value.unwrap_or("-"));
}

fn terms(terms: &OfferingTerms) -> String {
    let n = |v: Option<u32>| v.map(|v| v.to_string()).unwrap_or_else(|| "?".into());
    match terms {
        OfferingTerms::FreeStay {
            min_nights,
            max_nights,
        } => format!("free stay, {} to {} nights", n(*min_nights), n(*max_nights)),
        OfferingTerms::Paid { max_amount } => match max_amount {
            Some(amount) => format!("paid, up to {amount}"),
            None => "paid".to_string(),
        },
        OfferingTerms::Discount { percentage } => match percentage {
            Some(p) => format!("discount, {p}%"),
            None => "discount".to_string(),
        },
    }
}

fn listing(listing: &Listing) {
    println!("  - {} ({})", listing.name, listing.id);
    println!("      {}  [{}]", listing.location, listing.status);
    for url in &listing.images {
        println!("      image {url}");
    }
    for offering in &listing.collaboration_offerings {
        println!("      offers {}", terms(&offering.terms));
    }
    if let Some(r) = &listing.creator_requirements {
        let ages = match (r.target_age_min, r.target_age_max) {
            (Some(min), Some(max)) => format!("ages {min}-{max}"),
            _ => "any age".to_string(),
        };
        let followers = r
            .min_followers
            .map(|f| format!("{f}+ followers"))
            .unwrap_or_else(|| "any reach".to_string());
        println!("      wants {followers}, {ages}");
    }
}

pub fn detail(user: &UserDetail) {
    println!("{} <{}>", user.name, user.email);
    field("id", Some(&user.id.to_string()));
    field("type", Some(user.user_type.as_str()));
    field("status", Some(user.status.as_str()));
    field(
        "email verified",
        Some(if user.email_verified { "yes" } else { "no" }),
    );
    field("created", Some(&user.created_at));

    match &user.profile {
        Some(Profile::Creator(p)) => {
            println!("Creator profile");
            field("location", p.location.as_deref());
            field("description", p.short_description.as_deref());
            field("portfolio", p.portfolio_link.as_deref());
            field("phone", p.phone.as_deref());
            field("picture", p.profile_picture.as_deref());
            field(
                "complete",
                Some(if p.profile_complete { "yes" } else { "no" }),
            );
            for platform in &p.platforms {
                println!(
                    "  - {:?} {} ({} followers, {}% engagement)",
                    platform.name, platform.handle, platform.followers, platform.engagement_rate
                );
            }
        }
        Some(Profile::Hotel(p)) => {
            println!("Hotel profile");
            field("name", Some(&p.name));
            field("location", Some(&p.location));
            field("website", p.website.as_deref());
            field("phone", p.phone.as_deref());
            field("about", p.about.as_deref());
            field("picture", p.picture.as_deref());
            println!("Listings ({})", p.listings.len());
            for l in &p.listings {
                listing(l);
            }
        }
        None => {}
    }
}

pub fn creation(report: &CreationReport) {
    let headline = match report.status() {
        OutcomeStatus::Ok => "User created",
        OutcomeStatus::Partial => "User created with warnings",
        OutcomeStatus::Failed => "User creation failed",
    };
    println!("{headline}");
    println!("{}", user_row(&report.user));

    match &report.profile_picture {
        PictureOutcome::Uploaded(url) => println!("  picture  {url}"),
        PictureOutcome::Failed => println!("  picture  not uploaded"),
        PictureOutcome::NotStaged => {}
    }
    for outcome in &report.listings {
        let state = match &outcome.result {
            ListingResult::Created(l) => format!("created {}", l.id),
            ListingResult::CreatedWithoutImages(l) => format!("created {} without images", l.id),
            ListingResult::Skipped(err) => format!("skipped: {err}"),
            ListingResult::Failed(err) => format!("failed: {err}"),
            ListingResult::NotAttempted => "not attempted".to_string(),
        };
        println!("  listing {} {:?}  {state}", outcome.index + 1, outcome.name);
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
}

/// 1234 → "1.2K", 2500000 → "2.5M".
pub fn compact_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

pub fn marketplace_listings(listings: &[MarketplaceListing]) {
    println!("Listings ({})", listings.len());
    for l in listings {
        println!("  - {} at {} ({})", l.name, l.hotel_name, l.id);
        println!("      {}  {} images", l.location, l.images.len());
        for offering in &l.collaboration_offerings {
            println!("      offers {}", terms(&offering.terms));
        }
        if let Some(r) = &l.creator_requirements {
            let followers = r
                .min_followers
                .map(|f| format!("min {} followers", compact_count(f)))
                .unwrap_or_else(|| "any reach".to_string());
            let ages = if r.target_age_groups.is_empty() {
                "any age".to_string()
            } else {
                r.target_age_groups.join(", ")
            };
            println!("      wants {followers}, {ages}");
        }
    }
}

pub fn marketplace_creators(creators: &[MarketplaceCreator]) {
    println!("Creators ({})", creators.len());
    for c in creators {
        let rating = c
            .rating()
            .map(|r| format!("{r:.1} from {} reviews", c.total_reviews))
            .unwrap_or_else(|| "no reviews".to_string());
        println!(
            "  - {} ({})  audience {}  {rating}",
            c.name,
            c.id,
            compact_count(c.audience_size)
        );
        for platform in &c.platforms {
            println!(
                "      {:?} {} ({} followers, {}% engagement)",
                platform.name,
                platform.handle,
                compact_count(platform.followers),
                platform.engagement_rate
            );
        }
    }
}
