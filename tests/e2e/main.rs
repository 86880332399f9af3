mod helpers;

mod test_articles;
mod test_health;
