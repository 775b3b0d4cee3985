use chrono::NaiveDate;
use kobis::{Client, ImageType, errors::Error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    let client = Client::new();

    let start = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
    let end = NaiveDate::from_ymd_opt(2024, 1, 17).expect("valid date");

    let box_office = client.box_office(start, end).await?;

    for (date, entries) in &box_office {
        println!("{date}");
        for entry in entries {
            println!("  {entry}");
        }
    }

    let Some(top) = box_office.by_date(start)?.first() else {
        return Ok(());
    };

    let movie = client.movie(top.code()).await?;

    println!("{}", top.title());
    println!("  poster: {}", movie.main_poster()?);
    println!("  still cuts: {:?}", movie.image_urls(ImageType::StillCut, true)?);
    println!("  synopsis: {}", movie.synopsis()?);

    Ok(())
}
