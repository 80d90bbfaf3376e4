use std::fs;
use std::path::{Path, PathBuf};

pub const MOVIES_CSV: &str = r#"movie_id,title,cast,crew,genres,overview
19995,Avatar,"[{""name"": ""Sam Worthington""}, {""name"": ""Zoe Saldana""}]","[{""name"": ""James Cameron"", ""job"": ""Director""}]","[{""name"": ""Action""}, {""name"": ""Science Fiction""}]","A paraplegic marine dispatched to the moon Pandora on a unique mission."
597,Titanic,"[{""name"": ""Kate Winslet""}, {""name"": ""Leonardo DiCaprio""}]","[{""name"": ""James Cameron"", ""job"": ""Director""}]","[{""name"": ""Drama""}, {""name"": ""Romance""}]","A seventeen-year-old aristocrat falls in love with a kind but poor artist aboard the ship."
679,Aliens,"[{""name"": ""Sigourney Weaver""}]","[{""name"": ""James Cameron"", ""job"": ""Director""}]","[{""name"": ""Action""}, {""name"": ""Science Fiction""}]","Ripley returns with a unit of space marines to fight alien creatures."
218,The Terminator,"[{""name"": ""Arnold Schwarzenegger""}]","[{""name"": ""James Cameron"", ""job"": ""Director""}]","[{""name"": ""Action""}, {""name"": ""Science Fiction""}]","A cyborg assassin is sent back in time."
155,The Dark Knight,"[{""name"": ""Christian Bale""}]","[{""name"": ""Christopher Nolan""}]","[{""name"": ""Action""}, {""name"": ""Crime""}]","Batman raises the stakes in his war on crime."
27205,Inception,"[{""name"": ""Leonardo DiCaprio""}]","[{""name"": ""Christopher Nolan""}]","[{""name"": ""Action""}, {""name"": ""Science Fiction""}]","A thief who steals corporate secrets through dream-sharing technology."
11036,The Notebook,"[{""name"": ""Ryan Gosling""}]","[{""name"": ""Nick Cassavetes""}]","[{""name"": ""Romance""}, {""name"": ""Drama""}]","An epic love story centered around an older man who reads aloud to a woman."
862,Toy Story,"[{'name': 'Tom Hanks'}]",not-a-list,"[{""name"": ""Animation""}]",
"#;

pub fn write_dataset(dir: &Path) -> PathBuf {
    let path = dir.join("movies.csv");
    fs::write(&path, MOVIES_CSV).unwrap();
    path
}
