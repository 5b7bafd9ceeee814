//! Reply texts sent to club members.

use chrono::{NaiveDate, NaiveTime};
use storage::{EventWithCount, MemberEvent, MemberProfile, MemberStatus, RegistrationStatus};

pub const HELP: &str = "📋 Доступные команды:\n\n\
/events - Ближайшие мероприятия\n\
/myevents - Мои записи\n\
/profile - Мой профиль\n\
/help - Эта справка\n\n\
По вопросам пишите администратору";

pub const NO_UPCOMING_EVENTS: &str = "Пока нет запланированных мероприятий 😔";
pub const START_FIRST: &str = "Сначала используйте /start для регистрации";
pub const ALREADY_REGISTERED: &str = "Вы уже записаны на это мероприятие ✅";
pub const EVENT_FULL: &str = "К сожалению, все места заняты 😔";
pub const REGISTERED: &str = "Отлично! Вы записаны на мероприятие 🎉";
pub const EVENT_NOT_FOUND: &str = "Мероприятие не найдено. Используйте /events для списка";
pub const MALFORMED_REGISTER: &str = "Неверный формат команды";
pub const NO_MY_EVENTS: &str = "У вас пока нет записей на мероприятия\n\n\
Используйте /events для просмотра доступных мероприятий";
pub const PROFILE_NOT_FOUND: &str = "Профиль не найден. Используйте /start для регистрации";
pub const UNKNOWN_COMMAND: &str = "Не понял команду 🤔\n\n\
Используйте /help для списка доступных команд";

pub fn welcome(first_name: &str) -> String {
    format!(
        "Привет, {first_name}! 🧖\n\n\
         Добро пожаловать в Банный Клуб!\n\n\
         Я помогу тебе:\n\
         🔹 Записаться на мероприятия\n\
         🔹 Узнать о предстоящих парениях\n\
         🔹 Получить информацию о банях и пармастерах\n\n\
         Используй /help для списка команд"
    )
}

pub fn welcome_back(first_name: &str) -> String {
    format!("С возвращением, {first_name}! 👋\n\nИспользуй /help для списка команд")
}

/// Marker for an event format; unknown formats get the generic bath marker.
pub fn format_emoji(format: &str) -> &'static str {
    match format {
        "women" => "👭",
        "men" => "👬",
        "mixed" => "👫",
        _ => "🧖",
    }
}

pub fn status_emoji(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Registered => "✅",
        RegistrationStatus::Attended => "🎉",
        RegistrationStatus::Cancelled => "❌",
    }
}

/// Human label of a format preference; unknown values are shown as stored.
pub fn preference_label(format: &str) -> &str {
    match format {
        "women" => "Женская",
        "men" => "Мужская",
        "mixed" => "Совместная",
        "soft" => "Мягкий пар",
        "hot" => "Горячий пар",
        other => other,
    }
}

fn status_label(status: MemberStatus) -> &'static str {
    match status {
        MemberStatus::New => "Новичок",
        MemberStatus::Active => "Активный",
    }
}

fn when(date: NaiveDate, time: NaiveTime) -> String {
    format!("{} в {}", date.format("%d.%m.%Y"), time.format("%H:%M"))
}

pub fn upcoming_events(events: &[EventWithCount]) -> String {
    if events.is_empty() {
        return NO_UPCOMING_EVENTS.to_string();
    }

    let mut text = String::from("🗓 Ближайшие мероприятия:\n\n");
    for item in events {
        let event = &item.event;
        text.push_str(&format!(
            "{} {}\n📅 {}\n📍 {}\n👥 Записано: {}/{}\n/register_{}\n\n",
            format_emoji(&event.format),
            event.title,
            when(event.event_date, event.start_time),
            event.location,
            item.registered,
            event.capacity,
            event.id,
        ));
    }
    text.trim_end().to_string()
}

pub fn my_events(events: &[MemberEvent]) -> String {
    if events.is_empty() {
        return NO_MY_EVENTS.to_string();
    }

    let mut text = String::from("📝 Ваши записи:\n\n");
    for event in events {
        text.push_str(&format!(
            "{} {}\n📅 {}\n📍 {}\n\n",
            status_emoji(event.status),
            event.title,
            when(event.event_date, event.start_time),
            event.location,
        ));
    }
    text.trim_end().to_string()
}

pub fn profile(profile: &MemberProfile) -> String {
    let mut text = format!(
        "👤 Ваш профиль:\n\n\
         Имя: {}\n\
         Статус: {}\n\
         В клубе с: {}\n\
         Посещено мероприятий: {}",
        profile.name,
        status_label(profile.status),
        profile.joined_date.format("%d.%m.%Y"),
        profile.events_count,
    );

    let preferences: Vec<&str> = profile
        .formats
        .iter()
        .filter(|f| !f.is_empty())
        .map(|f| preference_label(f))
        .collect();
    if !preferences.is_empty() {
        text.push_str(&format!("\nПредпочтения: {}", preferences.join(", ")));
    }
    text
}
