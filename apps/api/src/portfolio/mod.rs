// Portfolio ingestion: GitHub client, snapshot cache, cache-first fetcher,
// and skill extraction over the fetched repositories.

pub mod cache;
pub mod fetcher;
pub mod github;
pub mod skills;
