use chrono::{DateTime, Utc};
use crate::listing::{Listing, SourceTag};

const SAMPLES: [(&str, &str, &str, &str, &str, &str); 12] = [
    ("Python Backend Developer Intern, Data Analyst", "TechCorp Solutions", "Remote, Mumbai", "python-backend-developer-intern", "6 months", "₹15,000 - ₹25,000 per month"),
    ("Django Web Development Intern", "StartupHub India", "Work From Home", "django-web-development-intern", "3 months", "₹8,000 - ₹12,000 per month"),
    ("Flask API Developer Intern", "InnovateTech", "Remote, Bangalore", "flask-api-developer-intern", "4 months", "₹10,000 - ₹18,000 per month"),
    ("Python Data Science Intern", "DataAnalytics Pro", "Hybrid, Delhi", "python-data-science-intern", "6 months", "₹20,000 - ₹30,000 per month"),
    ("Full Stack Python Developer", "WebSolutions Ltd", "Remote, Pune", "full-stack-python-developer", "5 months", "₹12,000 - ₹22,000 per month"),
    ("Python Automation Intern", "AutoTech Systems", "Work From Home", "python-automation-intern", "3 months", "₹6,000 - ₹10,000 per month"),
    ("Django Frontend Developer", "CreativeWeb Studio", "Remote, Chennai", "django-frontend-developer", "4 months", "₹9,000 - ₹15,000 per month"),
    ("Python Machine Learning Intern", "AI Innovations", "Hybrid, Hyderabad", "python-machine-learning-intern", "6 months", "₹25,000 - ₹35,000 per month"),
    ("Flask Microservices Developer", "CloudTech Solutions", "Remote, Kolkata", "flask-microservices-developer", "5 months", "₹15,000 - ₹25,000 per month"),
    ("Python Testing Intern", "QualityAssurance Pro", "Work From Home", "python-testing-intern", "3 months", "₹7,000 - ₹12,000 per month"),
    ("Django E-commerce Developer", "ShopTech Solutions", "Remote, Ahmedabad", "django-ecommerce-developer", "4 months", "₹11,000 - ₹19,000 per month"),
    ("Python DevOps Intern", "DevOps Masters", "Hybrid, Jaipur", "python-devops-intern", "6 months", "₹18,000 - ₹28,000 per month"),
];

/// Placeholder listings shown while no source is producing data.
pub fn sample_listings(now: DateTime<Utc>) -> Vec<Listing> {
    SAMPLES
        .iter()
        .map(|&(title, company, location, slug, duration, stipend)| Listing {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            link: format!("https://internshala.com/internship/{}", slug),
            duration: duration.to_string(),
            stipend_range: stipend.to_string(),
            source: SourceTag::SampleData,
            scraped_at: now,
        })
        .collect()
}
