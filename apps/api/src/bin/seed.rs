//! Populate the portfolio with sample photos, testimonials and an about profile
//!
//! ```text
//! cargo run --bin seed
//! cargo run --bin seed -- --generate-images
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use portfolio_api::agents::llm::OpenAiClient;
use portfolio_api::agents::ImageAgent;
use portfolio_api::config::AppConfig;
use portfolio_api::domain::photo::{NewPhoto, Photo};
use portfolio_api::domain::profile::{AboutProfile, AboutProfileUpdate};
use portfolio_api::domain::repositories::DocumentStore;
use portfolio_api::domain::testimonial::{NewTestimonial, Testimonial};
use portfolio_api::infrastructure::repositories::{
    DocumentRepository, PostgresDocumentStore, SingletonRepository,
};

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Seed the portfolio database with sample content")]
struct Args {
    /// Generate photo and portrait images with the configured image model
    #[arg(long)]
    generate_images: bool,
}

struct SamplePhoto {
    title: &'static str,
    category: &'static str,
    description: &'static str,
    prompt: &'static str,
    label: &'static str,
    colors: (&'static str, &'static str),
    featured: bool,
}

const PHOTOS: &[SamplePhoto] = &[
    SamplePhoto {
        title: "Golden Hour Portrait",
        category: "portrait",
        description: "A stunning portrait captured during golden hour",
        prompt: "A professional portrait of a person during golden hour, warm lighting, soft focus background, natural outdoor setting, photorealistic",
        label: "Golden Hour",
        colors: ("#d4a373", "#8b5a3c"),
        featured: true,
    },
    SamplePhoto {
        title: "Mountain Landscape",
        category: "landscape",
        description: "Majestic mountain ranges at dawn",
        prompt: "Majestic snow-capped mountain ranges at dawn, dramatic sky with clouds, alpine landscape, photorealistic nature photography",
        label: "Mountains",
        colors: ("#4a5568", "#2d3748"),
        featured: false,
    },
    SamplePhoto {
        title: "Wedding Ceremony",
        category: "wedding",
        description: "Beautiful wedding moments captured",
        prompt: "Elegant wedding ceremony moment, bride and groom at altar, romantic lighting, flower decorations, photorealistic wedding photography",
        label: "Wedding",
        colors: ("#f7fafc", "#e2e8f0"),
        featured: false,
    },
    SamplePhoto {
        title: "Commercial Product Shot",
        category: "commercial",
        description: "Professional commercial photography",
        prompt: "Professional commercial product photography, luxury watch on black background, studio lighting, high-end advertising style, photorealistic",
        label: "Product",
        colors: ("#171717", "#262626"),
        featured: false,
    },
    SamplePhoto {
        title: "Urban Portrait",
        category: "portrait",
        description: "Street portrait with urban backdrop",
        prompt: "Street portrait with urban city backdrop, fashionable person, urban graffiti wall, natural lighting, photorealistic street photography",
        label: "Urban",
        colors: ("#667eea", "#764ba2"),
        featured: false,
    },
    SamplePhoto {
        title: "Sunset Over Water",
        category: "landscape",
        description: "Breathtaking sunset over calm waters",
        prompt: "Breathtaking sunset over calm ocean waters, colorful sky with orange and pink hues, peaceful seascape, photorealistic landscape photography",
        label: "Sunset",
        colors: ("#ff6b6b", "#4a5568"),
        featured: false,
    },
];

const TESTIMONIALS: &[(&str, &str)] = &[
    (
        "Sarah Johnson",
        "Absolutely stunning work! The photographer captured our wedding day perfectly. Every moment was beautifully documented and we couldn't be happier with the results.",
    ),
    (
        "Michael Chen",
        "Professional, creative, and a pleasure to work with. The portrait session was relaxed and fun, and the final images exceeded all expectations.",
    ),
    (
        "Emily Rodriguez",
        "Incredible eye for detail and lighting. Our commercial product shots look amazing and have really elevated our brand presence. Highly recommend!",
    ),
];

const PORTRAIT_PROMPT: &str = "Professional photographer portrait, middle-aged person with camera, warm friendly smile, professional studio lighting, neutral background, photorealistic headshot";

const BIO: &str = "With over 10 years of experience in photography, I specialize in portraits, weddings, and landscape photography. My approach combines technical expertise with creative vision to create images that tell your story.";

/// Gradient placeholder as a URL-encoded SVG data URI
fn placeholder_svg(label: &str, (from, to): (&str, &str)) -> String {
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='800' height='1000'>\
         <defs><linearGradient id='g' x1='0%' y1='0%' x2='100%' y2='100%'>\
         <stop offset='0%' stop-color='{}'/><stop offset='100%' stop-color='{}'/>\
         </linearGradient></defs>\
         <rect fill='url(#g)' width='800' height='1000'/>\
         <text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' \
         fill='white' font-family='serif' font-size='40' opacity='0.6'>{}</text></svg>",
        from, to, label
    );

    let mut encoded = String::with_capacity(svg.len() + 64);
    for c in svg.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            '<' => encoded.push_str("%3C"),
            '>' => encoded.push_str("%3E"),
            '#' => encoded.push_str("%23"),
            '"' => encoded.push_str("%22"),
            _ => encoded.push(c),
        }
    }
    format!("data:image/svg+xml,{}", encoded)
}

/// Generated image URL, or `None` (logged) when generation fails
async fn generate(agent: Option<&ImageAgent>, prompt: &str) -> Option<String> {
    let agent = agent?;
    let result = agent.generate_image(prompt).await;
    match result.image_url {
        Some(url) if result.success => Some(url),
        _ => {
            tracing::warn!(reason = %result.description, "Image generation failed, using placeholder");
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("seed=info,portfolio_api=info")),
        )
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    let postgres = PostgresDocumentStore::new(pool.clone());
    postgres.migrate().await?;
    let store: Arc<dyn DocumentStore> = Arc::new(postgres);

    let image_agent = if args.generate_images {
        let llm = OpenAiClient::new(&config.agents).context("Failed to configure image model")?;
        Some(ImageAgent::new(Arc::new(llm)))
    } else {
        None
    };

    let photos = DocumentRepository::<Photo>::new(store.clone());
    for (index, sample) in PHOTOS.iter().enumerate() {
        let image_data = match generate(image_agent.as_ref(), sample.prompt).await {
            Some(url) => url,
            None => placeholder_svg(sample.label, sample.colors),
        };
        let photo = Photo::new(NewPhoto {
            title: sample.title.to_string(),
            category: sample.category.to_string(),
            image_data,
            description: sample.description.to_string(),
            featured: sample.featured,
            order: index as i64 + 1,
        })
        .map_err(anyhow::Error::msg)?;
        photos.create(&photo).await?;
        tracing::info!(title = sample.title, category = sample.category, "Seeded photo");
    }

    let testimonials = DocumentRepository::<Testimonial>::new(store.clone());
    for (index, (client_name, text)) in TESTIMONIALS.iter().enumerate() {
        let testimonial = Testimonial::new(NewTestimonial {
            client_name: client_name.to_string(),
            testimonial_text: text.to_string(),
            rating: 5,
            order: index as i64 + 1,
        })
        .map_err(anyhow::Error::msg)?;
        testimonials.create(&testimonial).await?;
        tracing::info!(client = client_name, "Seeded testimonial");
    }

    let portrait = generate(image_agent.as_ref(), PORTRAIT_PROMPT)
        .await
        .unwrap_or_default();
    let defaults = AboutProfile::placeholder();
    let profile = SingletonRepository::<AboutProfile>::new(store)
        .update(&AboutProfileUpdate {
            bio_text: Some(BIO.to_string()),
            photographer_name: Some("Alex Rivera".to_string()),
            tagline: Some(defaults.tagline),
            portrait_image: Some(portrait),
        })
        .await?;
    tracing::info!(photographer = %profile.photographer_name, "Seeded about profile");

    pool.close().await;
    tracing::info!("Seeding complete");
    Ok(())
}
