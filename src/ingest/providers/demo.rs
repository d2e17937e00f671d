// src/ingest/providers/demo.rs
//! Bundled fallback datasets. Timestamps are relative to first use and then
//! frozen, so every fallback in a process returns identical records.

use chrono::{Duration, SecondsFormat, Utc};
use once_cell::sync::Lazy;

use crate::ingest::types::{ArticleSource, NewsArticle, Platform, SocialPost, TmdbMovie};

fn hours_ago(h: i64) -> String {
    (Utc::now() - Duration::hours(h)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn minutes_ago(m: i64) -> String {
    (Utc::now() - Duration::minutes(m)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn pexels(photo: &str) -> String {
    format!("https://images.pexels.com/photos/{photo}?auto=compress&cs=tinysrgb&w=800")
}

fn pexels_avatar(photo: &str) -> String {
    format!("https://images.pexels.com/photos/{photo}?auto=compress&cs=tinysrgb&w=100&h=100&dpr=2")
}

pub static DEMO_NEWS: Lazy<Vec<NewsArticle>> = Lazy::new(|| {
    vec![
        NewsArticle {
            source: ArticleSource {
                id: Some("techcrunch".into()),
                name: "TechCrunch".into(),
            },
            author: Some("Sarah Perez".into()),
            title: Some("AI Revolution: How Machine Learning is Transforming Industries".into()),
            description: Some("Artificial intelligence and machine learning are reshaping everything from healthcare to finance, creating new opportunities and challenges.".into()),
            url: "https://techcrunch.com/ai-revolution".into(),
            url_to_image: Some(pexels("8386440/pexels-photo-8386440.jpeg")),
            published_at: hours_ago(2),
            content: Some("The artificial intelligence revolution is here, and it's transforming industries at an unprecedented pace...".into()),
        },
        NewsArticle {
            source: ArticleSource {
                id: Some("wired".into()),
                name: "Wired".into(),
            },
            author: Some("Alex Johnson".into()),
            title: Some("The Future of Remote Work: Trends and Technologies".into()),
            description: Some("As remote work becomes permanent, new technologies and practices are emerging to support distributed teams.".into()),
            url: "https://wired.com/remote-work-future".into(),
            url_to_image: Some(pexels("4226140/pexels-photo-4226140.jpeg")),
            published_at: hours_ago(4),
            content: Some("Remote work has evolved from a temporary pandemic solution to a permanent fixture of the modern workplace...".into()),
        },
        NewsArticle {
            source: ArticleSource {
                id: Some("the-verge".into()),
                name: "The Verge".into(),
            },
            author: Some("Emma Chen".into()),
            title: Some("Sustainable Technology: Green Innovations for 2024".into()),
            description: Some("Tech companies are leading the charge in sustainability with innovative solutions for climate change.".into()),
            url: "https://theverge.com/sustainable-tech".into(),
            url_to_image: Some(pexels("9875414/pexels-photo-9875414.jpeg")),
            published_at: hours_ago(6),
            content: Some("The technology sector is embracing sustainability like never before, with companies investing billions...".into()),
        },
        NewsArticle {
            source: ArticleSource {
                id: Some("ars-technica".into()),
                name: "Ars Technica".into(),
            },
            author: Some("Michael Rodriguez".into()),
            title: Some("Cybersecurity in 2024: New Threats and Defense Strategies".into()),
            description: Some("As cyber threats evolve, organizations must adapt their security strategies to protect against sophisticated attacks.".into()),
            url: "https://arstechnica.com/cybersecurity-2024".into(),
            url_to_image: Some(pexels("60504/security-protection-anti-virus-software-60504.jpeg")),
            published_at: hours_ago(8),
            content: Some("Cybersecurity threats are becoming more sophisticated, requiring organizations to rethink their defense strategies...".into()),
        },
    ]
});

#[allow(clippy::too_many_arguments)]
fn demo_movie(
    id: u64,
    title: &str,
    overview: &str,
    slug: &str,
    release_date: &str,
    vote_average: f64,
    vote_count: u64,
    genre_ids: &[u32],
    popularity: f64,
) -> TmdbMovie {
    TmdbMovie {
        id,
        title: title.into(),
        overview: overview.into(),
        poster_path: Some(format!("/{slug}.jpg")),
        backdrop_path: Some(format!("/{slug}-backdrop.jpg")),
        release_date: release_date.into(),
        vote_average,
        vote_count,
        genre_ids: genre_ids.to_vec(),
        popularity,
        adult: false,
        video: false,
        original_language: "en".into(),
        original_title: title.into(),
    }
}

pub static DEMO_MOVIES: Lazy<Vec<TmdbMovie>> = Lazy::new(|| {
    vec![
        demo_movie(
            1,
            "The Future of AI",
            "A documentary exploring the potential and challenges of artificial intelligence in the modern world.",
            "ai-documentary",
            "2024-01-15",
            8.5,
            1250,
            &[99, 878],
            95.5,
        ),
        demo_movie(
            2,
            "Code Warriors",
            "Follow the journey of software developers as they build the next generation of applications.",
            "code-warriors",
            "2024-02-20",
            7.8,
            890,
            &[99, 18],
            78.3,
        ),
        demo_movie(
            3,
            "Digital Revolution",
            "An in-depth look at how digital transformation is reshaping industries worldwide.",
            "digital-revolution",
            "2024-03-10",
            8.2,
            1100,
            &[99],
            88.7,
        ),
        demo_movie(
            4,
            "Startup Dreams",
            "The inspiring stories of entrepreneurs who turned their ideas into successful businesses.",
            "startup-dreams",
            "2024-04-05",
            7.6,
            750,
            &[99, 18],
            72.1,
        ),
    ]
});

#[allow(clippy::too_many_arguments)]
fn demo_post(
    n: u32,
    username: &str,
    display_name: &str,
    avatar: &str,
    content: &str,
    timestamp: String,
    (likes, shares, comments): (u32, u32, u32),
    hashtags: &[&str],
    platform: Platform,
    images: &[&str],
) -> SocialPost {
    SocialPost {
        id: format!("social-{n}"),
        username: username.into(),
        display_name: display_name.into(),
        avatar: pexels_avatar(avatar),
        content: content.into(),
        timestamp,
        likes,
        shares,
        comments,
        hashtags: hashtags.iter().map(|s| s.to_string()).collect(),
        images: images.iter().map(|p| pexels(p)).collect(),
        platform,
    }
}

pub static DEMO_SOCIAL_POSTS: Lazy<Vec<SocialPost>> = Lazy::new(|| {
    vec![
        demo_post(
            1,
            "techguru_sarah",
            "Sarah Tech",
            "774909/pexels-photo-774909.jpeg",
            "Just finished implementing a new React dashboard with real-time data fetching! The user experience is incredible. #ReactJS #WebDev #Dashboard",
            minutes_ago(30),
            (245, 18, 32),
            &["ReactJS", "WebDev", "Dashboard"],
            Platform::Twitter,
            &["11035380/pexels-photo-11035380.jpeg"],
        ),
        demo_post(
            2,
            "designmaster_alex",
            "Alex Design",
            "1239291/pexels-photo-1239291.jpeg",
            "Color psychology in UI design is fascinating! Here's how different colors affect user behavior and engagement. Swipe to see examples! 🎨",
            hours_ago(2),
            (189, 25, 41),
            &["UIDesign", "ColorTheory", "UX"],
            Platform::Instagram,
            &[
                "1629236/pexels-photo-1629236.jpeg",
                "196644/pexels-photo-196644.jpeg",
            ],
        ),
        demo_post(
            3,
            "startup_mike",
            "Mike Entrepreneur",
            "1222271/pexels-photo-1222271.jpeg",
            "Building a successful startup requires more than just a great idea. Here are 5 key lessons I learned from scaling our company to $10M ARR. Thread 🧵",
            hours_ago(4),
            (567, 89, 78),
            &["Startup", "Entrepreneurship", "Business"],
            Platform::Linkedin,
            &["3184287/pexels-photo-3184287.jpeg"],
        ),
        demo_post(
            4,
            "ai_researcher_emma",
            "Dr. Emma AI",
            "1181686/pexels-photo-1181686.jpeg",
            "Machine learning models are getting more sophisticated, but are we considering the ethical implications? Important discussion happening in the AI community. #AI #Ethics #MachineLearning",
            hours_ago(6),
            (423, 156, 92),
            &["AI", "Ethics", "MachineLearning"],
            Platform::Twitter,
            &["8386440/pexels-photo-8386440.jpeg"],
        ),
        demo_post(
            5,
            "remote_work_lisa",
            "Lisa Remote",
            "1181424/pexels-photo-1181424.jpeg",
            "Remote work productivity tips that actually work! After 3 years of working from home, these are my top strategies for staying focused and motivated. 💪",
            hours_ago(8),
            (312, 67, 45),
            &["RemoteWork", "Productivity", "WorkFromHome"],
            Platform::Linkedin,
            &["4226140/pexels-photo-4226140.jpeg"],
        ),
        demo_post(
            6,
            "frontend_dev_carlos",
            "Carlos Frontend",
            "1043471/pexels-photo-1043471.jpeg",
            "CSS Grid vs Flexbox: When to use which? Here's a comprehensive guide with real examples! Perfect for developers looking to master modern layouts. 🔥",
            hours_ago(10),
            (198, 34, 28),
            &["CSS", "WebDev", "Frontend"],
            Platform::Twitter,
            &["4164418/pexels-photo-4164418.jpeg"],
        ),
    ]
});
